use crate::core::{FileId, Language, SourceUnit};
use crate::errors::ParseFault;

pub mod javascript;

/// Builds the language-agnostic [`SourceUnit`] for one file.
///
/// Implementations wrap an external parser; a source the parser cannot
/// handle is reported as a [`ParseFault`] with its location.
pub trait SyntaxFacade: Send + Sync {
    fn parse(&self, source: &str, file: FileId) -> Result<SourceUnit, ParseFault>;
    fn language(&self) -> Language;
}

pub fn get_facade(language: Language) -> Option<Box<dyn SyntaxFacade>> {
    type FacadeFactory = fn() -> Box<dyn SyntaxFacade>;

    static FACADE_MAP: &[(Language, FacadeFactory)] = &[
        (Language::JavaScript, || {
            Box::new(javascript::JavaScriptFacade::new_javascript())
        }),
        (Language::TypeScript, || {
            Box::new(javascript::JavaScriptFacade::new_typescript())
        }),
    ];

    FACADE_MAP
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, factory)| factory())
}

/// Parses `source` with the facade registered for `language`.
pub fn parse_source(source: &str, file: FileId, language: Language) -> Result<SourceUnit, ParseFault> {
    match get_facade(language) {
        Some(facade) => facade.parse(source, file),
        None => Err(ParseFault::unpositioned(
            file,
            format!("unsupported language: {language}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facades_exist_for_supported_languages() {
        assert!(get_facade(Language::JavaScript).is_some());
        assert!(get_facade(Language::TypeScript).is_some());
        assert!(get_facade(Language::Unknown).is_none());
    }

    #[test]
    fn test_unknown_language_is_a_parse_fault() {
        let fault = parse_source("x", FileId::new("notes.txt"), Language::Unknown).unwrap_err();
        assert_eq!(fault.line, 0);
        assert!(fault.message.contains("unsupported language"));
    }
}
