use super::types::Intent;

pub const SCREEN_KEYWORDS: &[&str] = &["screen", "display", "what's on"];
pub const REMEMBER_KEYWORDS: &[&str] = &["remember", "save", "note"];
pub const RECALL_KEYWORDS: &[&str] = &["recall", "what do you remember", "tell me what you know"];
pub const EXPORT_KEYWORDS: &[&str] = &["export manual", "save manual", "create doc"];

/// One row of the routing table: any keyword present selects `intent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    pub const fn new(intent: Intent, keywords: &'static [&'static str]) -> Self {
        Self { intent, keywords }
    }

    /// `command` must already be lowercased.
    pub fn matches(&self, command: &str) -> bool {
        self.keywords.iter().any(|keyword| command.contains(keyword))
    }

    fn embeds_any_of(&self, other: &KeywordRule, command: &str) -> bool {
        self.keywords.iter().any(|phrase| {
            command.contains(phrase) && other.keywords.iter().any(|keyword| phrase.contains(keyword))
        })
    }
}

/// Routing table in priority order. Earlier rows win.
pub const DEFAULT_RULES: [KeywordRule; 4] = [
    KeywordRule::new(Intent::AnalyzeScreen, SCREEN_KEYWORDS),
    KeywordRule::new(Intent::RememberInfo, REMEMBER_KEYWORDS),
    KeywordRule::new(Intent::RecallInfo, RECALL_KEYWORDS),
    KeywordRule::new(Intent::ExportManual, EXPORT_KEYWORDS),
];

/// Maps a raw command to exactly one [`Intent`].
///
/// Matching is lowercase substring containment against an ordered rule table;
/// the first matching row wins and no match yields [`Intent::GeneralQuery`].
/// A lower row can only take over when one of its phrases is present in the
/// command and literally contains a keyword of the winning row, e.g.
/// "what do you remember" (recall) embeds "remember" (remember).
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<KeywordRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl IntentClassifier {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn classify(&self, command: &str) -> Intent {
        let command = command.to_lowercase();

        for (rank, rule) in self.rules.iter().enumerate() {
            if !rule.matches(&command) {
                continue;
            }

            let refined = self.rules[rank + 1..]
                .iter()
                .find(|later| later.embeds_any_of(rule, &command));

            return refined.map_or(rule.intent, |later| later.intent);
        }

        Intent::GeneralQuery
    }
}

/// Classifies with the default routing table.
pub fn infer_intent(command: &str) -> Intent {
    IntentClassifier::default().classify(command)
}
