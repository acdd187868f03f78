//! Default competency dataset used when LLM extraction cannot produce a
//! mapping. Injected into `CompetencyMapper` at construction time.

use std::collections::BTreeMap;

use crate::competency::mapping::{CompetencyMapping, JobProfile, LevelKey};

/// Bump when the seed table below changes.
pub const SEED_VERSION: &str = "2024.1";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn profile(
    levels: &[&str],
    technical: &[&str],
    managerial: &[&str],
    socio_cultural: &[&str],
    indicators: [&[&str]; 4],
) -> JobProfile {
    let behavioral_indicators: BTreeMap<LevelKey, Vec<String>> = LevelKey::ALL
        .into_iter()
        .zip(indicators)
        .map(|(key, items)| (key, strings(items)))
        .collect();
    JobProfile {
        levels: strings(levels),
        technical: strings(technical),
        managerial: strings(managerial),
        socio_cultural: strings(socio_cultural),
        behavioral_indicators,
    }
}

pub fn default_mapping() -> CompetencyMapping {
    let mut mapping = CompetencyMapping::new();

    mapping.insert(
        "Analis Kepegawaian",
        profile(
            &["Ahli Pertama", "Ahli Muda", "Ahli Madya", "Ahli Utama"],
            &[
                "Manajemen SDM",
                "Analisis Jabatan",
                "Rekrutmen dan Seleksi",
                "Pengembangan Kompetensi",
                "Evaluasi Kinerja",
            ],
            &[
                "Perencanaan",
                "Pengorganisasian",
                "Pengawasan",
                "Evaluasi Kinerja",
                "Pengambilan Keputusan",
            ],
            &[
                "Komunikasi",
                "Kerjasama",
                "Pelayanan Publik",
                "Integritas",
                "Adaptabilitas",
            ],
            [
                &[
                    "Menyelesaikan tugas rutin sesuai prosedur",
                    "Berkomunikasi efektif dengan atasan langsung",
                    "Mengumpulkan data yang diperlukan",
                ],
                &[
                    "Mengkoordinasikan tim kecil dalam penyelesaian tugas",
                    "Melakukan analisis data sederhana",
                    "Menyusun laporan periodik yang komprehensif",
                ],
                &[
                    "Menyusun strategi pengembangan SDM",
                    "Memimpin unit kerja dengan efektif",
                    "Melakukan analisis kebijakan kepegawaian",
                ],
                &[
                    "Mengembangkan kebijakan nasional di bidang kepegawaian",
                    "Memimpin organisasi dengan visi yang jelas",
                    "Melakukan inovasi sistem manajemen SDM",
                ],
            ],
        ),
    );

    mapping.insert(
        "Pengawas Pemerintahan",
        profile(
            &["Pengawas", "Pengawas Madya", "Pengawas Utama"],
            &[
                "Pengawasan",
                "Audit",
                "Evaluasi Kinerja",
                "Analisis Risiko",
                "Investigasi",
            ],
            &[
                "Kepemimpinan",
                "Pengambilan Keputusan",
                "Pengendalian",
                "Manajemen Konflik",
                "Strategi Pengawasan",
            ],
            &[
                "Integritas",
                "Objektivitas",
                "Ketegasan",
                "Komunikasi Assertif",
                "Keberanian Moral",
            ],
            [
                &[
                    "Melakukan pengawasan rutin sesuai checklist",
                    "Menyusun laporan temuan pengawasan",
                    "Mengikuti prosedur audit standar",
                ],
                &[
                    "Memimpin tim pengawasan kecil",
                    "Melakukan analisis temuan kompleks",
                    "Menyusun rekomendasi perbaikan yang actionable",
                ],
                &[
                    "Mengembangkan sistem pengawasan yang efektif",
                    "Memimpin investigasi kasus kompleks",
                    "Melakukan evaluasi kebijakan organisasi",
                ],
                &[
                    "Menyusun kebijakan pengawasan nasional",
                    "Memimpin organisasi pengawasan yang kredibel",
                    "Mengembangkan standar audit nasional",
                ],
            ],
        ),
    );

    mapping.insert(
        "Pranata Komputer",
        profile(
            &[
                "Pranata Komputer",
                "Pranata Komputer Madya",
                "Pranata Komputer Utama",
            ],
            &[
                "Pengembangan Sistem",
                "Manajemen Basis Data",
                "Keamanan Informasi",
                "Analisis Kebutuhan",
                "Arsitektur Enterprise",
            ],
            &[
                "Manajemen Proyek TI",
                "Koordinasi Tim",
                "Perencanaan Teknologi",
                "Penganggaran TI",
                "Manajemen Vendor",
            ],
            &[
                "Kolaborasi",
                "Komunikasi Teknis",
                "Adaptabilitas",
                "Service Orientation",
                "Problem Solving",
            ],
            [
                &[
                    "Mengembangkan modul aplikasi sederhana",
                    "Melakukan pemeliharaan sistem rutin",
                    "Membuat dokumentasi teknis yang jelas",
                ],
                &[
                    "Menganalisis kebutuhan pengguna secara komprehensif",
                    "Mengkoordinasikan pengembangan sistem terintegrasi",
                    "Mengelola basis data dengan optimal",
                ],
                &[
                    "Mendesain arsitektur sistem enterprise",
                    "Memanajemen proyek TI yang kompleks",
                    "Menyusun strategi transformasi digital",
                ],
                &[
                    "Mengembangkan kebijakan teknologi nasional",
                    "Melakukan inovasi sistem pemerintahan digital",
                    "Menyusun standarisasi TI nasional",
                ],
            ],
        ),
    );

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_covers_three_jobs_with_all_levels() {
        let mapping = default_mapping();
        assert_eq!(
            mapping.job_list(),
            vec![
                "Analis Kepegawaian",
                "Pengawas Pemerintahan",
                "Pranata Komputer"
            ]
        );
        for job in mapping.job_list() {
            let profile = mapping.job_info(&job);
            for key in LevelKey::ALL {
                assert_eq!(profile.indicators(key).len(), 3, "{job} {key}");
            }
        }
    }
}
