// Shared prompt plumbing and cross-cutting prompt fragments.
// Each component that needs LLM calls defines its own prompts.rs alongside it
// using `PromptTemplate`.

use thiserror::Error;

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Anda adalah asisten yang presisi dan terstruktur. \
    Anda WAJIB menjawab hanya dengan JSON yang valid. \
    JANGAN menulis teks apa pun di luar JSON. \
    JANGAN menggunakan code fence markdown. \
    JANGAN menambahkan penjelasan.";

/// System prompt for free-text assessment work.
pub const ASSESSOR_SYSTEM: &str = "Anda adalah asesor kompetensi ASN yang objektif. \
    Gunakan Bahasa Indonesia profesional dan ikuti format keluaran persis seperti diminta.";

#[derive(Debug, Error, PartialEq)]
pub enum PromptError {
    #[error("template '{template}' requires placeholder '{name}'")]
    Missing {
        template: &'static str,
        name: &'static str,
    },

    #[error("template '{template}' does not declare placeholder '{name}'")]
    Unknown { template: &'static str, name: String },
}

/// An LLM prompt with its declared `{name}` placeholders.
///
/// Only declared placeholders are substituted, so literal braces in JSON
/// schema examples pass through untouched.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub placeholders: &'static [&'static str],
    pub template: &'static str,
}

impl PromptTemplate {
    pub const fn new(
        name: &'static str,
        placeholders: &'static [&'static str],
        template: &'static str,
    ) -> Self {
        Self {
            name,
            placeholders,
            template,
        }
    }

    /// Substitutes every declared placeholder. Fails if one is not supplied
    /// or if an undeclared name is supplied.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, PromptError> {
        let undeclared = vars
            .iter()
            .find(|(n, _)| !self.placeholders.iter().any(|p| p == n));
        if let Some((name, _)) = undeclared {
            return Err(PromptError::Unknown {
                template: self.name,
                name: name.to_string(),
            });
        }

        let mut values = Vec::with_capacity(self.placeholders.len());
        for placeholder in self.placeholders {
            let value = vars
                .iter()
                .find(|(n, _)| n == placeholder)
                .map(|(_, v)| *v)
                .ok_or(PromptError::Missing {
                    template: self.name,
                    name: *placeholder,
                })?;
            values.push((*placeholder, value));
        }

        // Single pass: substituted values are never scanned again.
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let replaced = after.find('}').and_then(|close| {
                let name = &after[..close];
                values
                    .iter()
                    .find(|(p, _)| *p == name)
                    .map(|(_, v)| (*v, close))
            });
            match replaced {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: PromptTemplate = PromptTemplate::new(
        "greeting",
        &["nama", "jabatan"],
        r#"Halo {nama} ({jabatan}). Format: {"skor": 1}"#,
    );

    #[test]
    fn test_render_substitutes_declared_placeholders_only() {
        let out = GREETING
            .render(&[("nama", "Budi"), ("jabatan", "Analis")])
            .unwrap();
        assert_eq!(out, r#"Halo Budi (Analis). Format: {"skor": 1}"#);
    }

    #[test]
    fn test_render_fails_on_missing_placeholder() {
        let err = GREETING.render(&[("nama", "Budi")]).unwrap_err();
        assert_eq!(
            err,
            PromptError::Missing {
                template: "greeting",
                name: "jabatan"
            }
        );
    }

    #[test]
    fn test_render_fails_on_unknown_placeholder() {
        let err = GREETING
            .render(&[("nama", "Budi"), ("jabatan", "Analis"), ("umur", "40")])
            .unwrap_err();
        assert!(matches!(err, PromptError::Unknown { .. }));
    }

    #[test]
    fn test_values_containing_braces_are_not_rescanned() {
        let out = GREETING
            .render(&[("nama", "{jabatan}"), ("jabatan", "Analis")])
            .unwrap();
        assert!(out.starts_with("Halo {jabatan} (Analis)"));
    }
}
