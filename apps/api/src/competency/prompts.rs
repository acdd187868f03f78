// LLM prompt templates for the competency mapper.

use crate::llm_client::prompts::PromptTemplate;

/// Mapping extraction prompt. `{sample_content}` is a bounded sample of the
/// source documents.
pub const MAPPING_EXTRACTION_PROMPT: PromptTemplate = PromptTemplate::new(
    "mapping_extraction",
    &["sample_content"],
    r#"ANALISIS DOKUMEN STANDAR KOMPETENSI JABATAN:

{sample_content}

TUGAS: Identifikasi semua JABATAN dan KOMPETENSI yang disebutkan dalam dokumen.

FORMAT OUTPUT JSON:
{
  "nama_jabatan": {
    "level": ["level1", "level2"],
    "kompetensi_teknis": ["komp1", "komp2"],
    "kompetensi_manajerial": ["komp1", "komp2"],
    "kompetensi_sosial_kultural": ["komp1", "komp2"],
    "indikator_perilaku": {
      "level_1": ["indikator1", "indikator2"],
      "level_2": ["indikator1", "indikator2"],
      "level_3": ["indikator1", "indikator2"],
      "level_4": ["indikator1", "indikator2"]
    }
  }
}

HANYA output JSON, tanpa penjelasan tambahan."#,
);
