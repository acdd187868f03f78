// LLM prompt templates for SKJ extraction.

use crate::llm_client::prompts::PromptTemplate;

/// `{skj_text}` is the preprocessed document text, already truncated.
pub const EXTRACT_SKJ_PROMPT: PromptTemplate = PromptTemplate::new(
    "extract_skj",
    &["skj_text"],
    r#"Instruksi:
Anda adalah extractor yang memproses dokumen Standar Kompetensi Jabatan (SKJ).
Tugas: baca teks SKJ dan kembalikan **hanya** JSON valid (tidak ada teks penjelas lain).
Gunakan Bahasa Indonesia.

Format JSON yang WAJIB dikembalikan:
{
  "jabatan": "<nama jabatan>",
  "kode_jabatan": "<kode jabatan>",
  "unit_organisasi": "<unit organisasi>",
  "ringkasan_tugas": "<ringkasan tugas jabatan>",
  "kompetensi_manajerial": [
    {
      "nama_kompetensi": "<nama kompetensi>",
      "definisi": "<definisi kompetensi>",
      "level_1": {"deskripsi": "<deskripsi level 1>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]},
      "level_2": {"deskripsi": "<deskripsi level 2>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]},
      "level_3": {"deskripsi": "<deskripsi level 3>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]},
      "level_4": {"deskripsi": "<deskripsi level 4>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]}
    }
  ],
  "kompetensi_teknis": [
    {
      "nama_kompetensi": "<nama kompetensi teknis>",
      "definisi": "<definisi kompetensi teknis>",
      "level_1": {"deskripsi": "<deskripsi level 1>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]},
      "level_2": {"deskripsi": "<deskripsi level 2>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]},
      "level_3": {"deskripsi": "<deskripsi level 3>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]},
      "level_4": {"deskripsi": "<deskripsi level 4>", "indikator_perilaku": ["<indikator1>", "<indikator2>"]}
    }
  ],
  "persyaratan_jabatan": {
    "pendidikan": "<persyaratan pendidikan>",
    "pelatihan": "<persyaratan pelatihan>",
    "pengalaman": "<persyaratan pengalaman>"
  },
  "metadata": {
    "sumber_file": "<nama_file>",
    "extracted_at": "<timestamp>",
    "extractor_version": "v1"
  }
}

Instruksi tambahan:
- Jika suatu field tidak ada di dokumen, isi dengan empty string atau empty list/object.
- Jangan mengarang indikator baru.
- Kembalikan output **ONLY JSON**.
- Pastikan format JSON valid.

Teks SKJ yang akan diproses:
{skj_text}"#,
);
