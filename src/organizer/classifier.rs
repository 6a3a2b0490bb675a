// file: src/organizer/classifier.rs
// description: file classification by filename and extension rules
// reference: ordered first-match rule chain

use crate::config::CategoryRule;
use crate::models::file_record::{Category, FileRecord};

const CORE_TERMS: &[&str] = &["system", "core", "main", "master"];
const DOC_EXTENSIONS: &[&str] = &[".md", ".txt", ".doc", ".pdf"];
const DOC_TERMS: &[&str] = &["readme", "doc", "guide", "manual"];
const CONFIG_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml", ".toml", ".env", ".config"];
const CONFIG_TERMS: &[&str] = &["config", "settings", "env"];
const CODE_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".go", ".rs"];

#[derive(Debug, Clone)]
struct Rule {
    category: Category,
    extensions: Vec<String>,
    terms: Vec<String>,
}

impl Rule {
    fn builtin(category: Category, extensions: &[&str], terms: &[&str]) -> Self {
        Self {
            category,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn from_config(rule: &CategoryRule) -> Self {
        Self {
            category: Category::from_label(&rule.category),
            extensions: rule.extensions.iter().map(|e| e.to_lowercase()).collect(),
            terms: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Substring match on the lowercased name, extensions included.
    fn matches(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.contains(ext.as_str()))
            || self.terms.iter().any(|term| name.contains(term.as_str()))
    }
}

pub struct FileClassifier {
    rules: Vec<Rule>,
}

impl FileClassifier {
    /// Built-in chain (core, documentation, configuration, code) followed by
    /// `extra_rules` in declared order.
    pub fn new(extra_rules: &[CategoryRule]) -> Self {
        let mut rules = vec![
            Rule::builtin(Category::Core, &[], CORE_TERMS),
            Rule::builtin(Category::Documentation, DOC_EXTENSIONS, DOC_TERMS),
            Rule::builtin(Category::Configuration, CONFIG_EXTENSIONS, CONFIG_TERMS),
            Rule::builtin(Category::Code, CODE_EXTENSIONS, &[]),
        ];
        rules.extend(extra_rules.iter().map(Rule::from_config));
        Self { rules }
    }

    pub fn categorize(&self, record: &FileRecord) -> Category {
        self.categorize_name(&record.name)
    }

    /// Returns the first matching category or `Unknown`.
    pub fn categorize_name(&self, name: &str) -> Category {
        let name = name.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&name))
            .map(|rule| rule.category.clone())
            .unwrap_or(Category::Unknown)
    }

    pub fn classify_all(&self, records: &mut [FileRecord]) {
        for record in records.iter_mut() {
            record.category = self.categorize(record);
        }
    }
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new(&[])
    }
}
