// LLM prompt templates for question generation and answer scoring.
// The "###" / "####" section headers are part of the output contract: the
// report aggregator reads the "SKOR:" line back out of scoring replies.

use crate::llm_client::prompts::PromptTemplate;

/// One realistic case study plus an essay question for a single competency.
/// `{indicators}` is a comma-separated list of up to three indicators;
/// `{indicator_1..3}` are the bullet lines under INDIKATOR YANG DIUKUR.
pub const QUESTION_GENERATION_PROMPT: PromptTemplate = PromptTemplate::new(
    "question_generation",
    &[
        "competency",
        "job",
        "level",
        "indicators",
        "indicator_1",
        "indicator_2",
        "indicator_3",
    ],
    r#"BUATKAN SOAL ASSESSMENT untuk mengukur kompetensi: {competency}

KONTEKS:
- Jabatan: {job}
- Level: {level}
- Indikator Perilaku: {indicators}

INSTRUKSI:
1. Buat 1 studi kasus REALISTIC yang relevan dengan jabatan {job}
2. Kasus harus mengukur indikator perilaku: {indicators}
3. Berikan pertanyaan yang membutuhkan jawaban essay/uraian
4. Situasi harus challenging sesuai level {level}
5. Kasus harus kontekstual dengan pekerjaan sehari-hari

FORMAT OUTPUT:
### STUDI KASUS:
[Deskripsi situasi realistic dan menantang]

### PERTANYAAN:
[Pertanyaan yang mengukur kompetensi secara spesifik]

### INDIKATOR YANG DIUKUR:
- {indicator_1}
- {indicator_2}
- {indicator_3}"#,
);

pub const SCORING_PROMPT: PromptTemplate = PromptTemplate::new(
    "scoring",
    &[
        "context",
        "indicators",
        "participant",
        "job",
        "competency",
        "level",
        "answer",
    ],
    r#"STANDAR PENILAIAN KOMPETENSI:
{context}

INDIKATOR PERILAKU LEVEL {level}:
{indicators}

DATA PENILAIAN:
- Nama: {participant}
- Jabatan: {job}
- Kompetensi: {competency}
- Level Target: {level}
- Jawaban Peserta: {answer}

TUGAS PENILAIAN:
1. Beri skor 1-5 berdasarkan kesesuaian dengan indikator di atas
2. Analisis DETAIL kesesuaian dengan setiap indikator
3. Identifikasi kekuatan spesifik dalam jawaban
4. Berikan rekomendasi pengembangan yang actionable
5. Tentukan level pencapaian (1-4) berdasarkan skor

KRITERIA SKOR:
- 5: Sangat Baik (melebihi ekspektasi level)
- 4: Baik (memenuhi semua indikator level)
- 3: Cukup (memenuhi sebagian besar indikator)
- 2: Perlu Perbaikan (hanya memenuhi beberapa indikator)
- 1: Tidak Memadai (tidak memenuhi indikator)

FORMAT OUTPUT:
### HASIL PENILAIAN
#### SKOR: [1-5]
#### LEVEL PENCAPAIAN: [1-4]
#### ANALISIS INDIKATOR:
- [Indikator 1]: [Analisis kesesuaian dan evidence dari jawaban]
- [Indikator 2]: [Analisis kesesuaian dan evidence dari jawaban]
- [Indikator 3]: [Analisis kesesuaian dan evidence dari jawaban]
#### KEKUATAN:
- [Kekuatan 1 dengan contoh dari jawaban]
- [Kekuatan 2 dengan contoh dari jawaban]
#### AREA PERBAIKAN:
- [Area 1 yang perlu dikembangkan]
- [Area 2 yang perlu dikembangkan]
#### REKOMENDASI PENGEMBANGAN:
- [Rekomendasi 1 yang spesifik dan actionable]
- [Rekomendasi 2 yang spesifik dan actionable]

Gunakan Bahasa Indonesia profesional dan objektif."#,
);

/// Question bank for one extracted SKJ record. `{skj_data}` is the record
/// as compact JSON.
pub const QUESTION_SET_PROMPT: PromptTemplate = PromptTemplate::new(
    "question_set",
    &["skj_data"],
    r#"Instruksi:
Berdasarkan data SKJ berikut, buat soal assessment dalam format JSON array.

DATA SKJ:
{skj_data}

INSTRUKSI PEMBUATAN SOAL:
1. Buat 3 soal multiple choice untuk setiap kompetensi manajerial
2. Buat 2 soal essay untuk setiap kompetensi manajerial
3. Buat 2 soal multiple choice untuk setiap kompetensi teknis
4. Buat 1 soal essay untuk setiap kompetensi teknis

FORMAT SOAL MCQ:
{
  "id_soal": "MCQ_[kompetensi]_[nomor]",
  "tipe": "mcq",
  "soal": "<pertanyaan>",
  "pilihan": {
    "A": "<pilihan A>",
    "B": "<pilihan B>",
    "C": "<pilihan C>",
    "D": "<pilihan D>"
  },
  "jawaban_benar": "<A/B/C/D>",
  "kunci_penilaian": "<penjelasan jawaban benar>",
  "kompetensi_target": "<nama kompetensi>",
  "level_target": "<level 1-4>",
  "bobot": 1
}

FORMAT SOAL ESSAY:
{
  "id_soal": "ESSAY_[kompetensi]_[nomor]",
  "tipe": "essay",
  "soal": "<pertanyaan>",
  "kunci_penilaian": "<kriteria penilaian essay>",
  "kompetensi_target": "<nama kompetensi>",
  "level_target": "<level 1-4>",
  "bobot": 2
}

ATURAN:
- Soal harus mengacu pada indikator perilaku di SKJ
- Level target disesuaikan dengan kompleksitas kompetensi
- Gunakan Bahasa Indonesia yang formal
- Kembalikan **ONLY JSON ARRAY**

OUTPUT:"#,
);
