//! Document and role types

use std::fmt;

/// Classification bucket of a source file, decided from its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileGroup {
    /// Justification / substantiation ("обґрунтування")
    Justification,
    /// Contract or draft contract ("договір", "проект")
    Contract,
    /// Anything else
    Additional,
}

impl FileGroup {
    /// Roles that must be present before a run may start
    pub const REQUIRED: [FileGroup; 2] = [FileGroup::Justification, FileGroup::Contract];

    /// Canonical label used as the document name
    pub fn label(self) -> &'static str {
        match self {
            FileGroup::Justification => "Justification",
            FileGroup::Contract => "Contract",
            FileGroup::Additional => "Additional",
        }
    }
}

impl fmt::Display for FileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Converted, OCR'd and labelled text of one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Role label, or the original file name for `Additional` files
    pub name: String,
    /// Recognized text
    pub text: String,
}

impl Document {
    /// Build a document for a classified file.
    ///
    /// `Additional` files keep their own file name so several attachments stay
    /// distinguishable in the request.
    pub fn labeled(group: FileGroup, file_name: &str, text: impl Into<String>) -> Self {
        let name = match group {
            FileGroup::Additional => file_name.to_string(),
            other => other.label().to_string(),
        };
        Self {
            name,
            text: text.into(),
        }
    }

    /// Text block sent to the inference service
    pub fn as_prompt_part(&self) -> String {
        format!("[Документ: {}]\n{}", self.name, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_uses_role_label() {
        let doc = Document::labeled(FileGroup::Contract, "dogovir_final.docx", "text");
        assert_eq!(doc.name, "Contract");
    }

    #[test]
    fn test_labeled_additional_keeps_file_name() {
        let doc = Document::labeled(FileGroup::Additional, "invoice 12.pdf", "text");
        assert_eq!(doc.name, "invoice 12.pdf");
    }

    #[test]
    fn test_prompt_part_format() {
        let doc = Document::labeled(FileGroup::Justification, "obgr.pdf", "рядок");
        assert_eq!(doc.as_prompt_part(), "[Документ: Justification]\nрядок");
    }
}
