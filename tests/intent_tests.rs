use ds_assistant::intent::{infer_intent, Intent, IntentClassifier, KeywordRule, DEFAULT_RULES};

#[test]
fn test_each_intent_has_a_trigger() {
    assert_eq!(infer_intent("What's on my screen?"), Intent::AnalyzeScreen);
    assert_eq!(infer_intent("remember buy milk"), Intent::RememberInfo);
    assert_eq!(infer_intent("recall"), Intent::RecallInfo);
    assert_eq!(infer_intent("export manual"), Intent::ExportManual);
    assert_eq!(infer_intent("Tell me a joke"), Intent::GeneralQuery);
}

#[test]
fn test_matching_ignores_case() {
    assert_eq!(infer_intent("READ THE DISPLAY"), Intent::AnalyzeScreen);
    assert_eq!(infer_intent("Please Note this down"), Intent::RememberInfo);
    assert_eq!(infer_intent("Create Doc now"), Intent::ExportManual);
}

#[test]
fn test_substring_matching_is_not_word_bounded() {
    // "notebook" contains "note"
    assert_eq!(infer_intent("where is my notebook"), Intent::RememberInfo);
    // "screenshot" contains "screen"
    assert_eq!(infer_intent("take a screenshot"), Intent::AnalyzeScreen);
}

#[test]
fn test_screen_outranks_everything() {
    assert_eq!(infer_intent("remember what's on the screen"), Intent::AnalyzeScreen);
    assert_eq!(infer_intent("save manual from the display"), Intent::AnalyzeScreen);
}

#[test]
fn test_remember_outranks_plain_recall_and_export() {
    assert_eq!(infer_intent("note to recall later"), Intent::RememberInfo);
    assert_eq!(infer_intent("remember to export manual"), Intent::RememberInfo);
}

#[test]
fn test_phrases_embedding_a_higher_keyword_select_their_own_intent() {
    assert_eq!(infer_intent("what do you remember"), Intent::RecallInfo);
    assert_eq!(infer_intent("Hey, what do you remember about me?"), Intent::RecallInfo);
    assert_eq!(infer_intent("save manual"), Intent::ExportManual);
}

#[test]
fn test_empty_command_is_general() {
    assert_eq!(infer_intent(""), Intent::GeneralQuery);
}

#[test]
fn test_custom_rule_table() {
    const HELP: &[&str] = &["help"];
    let classifier = IntentClassifier::new(vec![KeywordRule::new(Intent::ExportManual, HELP)]);

    assert_eq!(classifier.rules().len(), 1);
    assert_eq!(classifier.classify("I need help"), Intent::ExportManual);
    assert_eq!(classifier.classify("remember this"), Intent::GeneralQuery);
}

#[test]
fn test_default_rule_order() {
    let order: Vec<Intent> = DEFAULT_RULES.iter().map(|rule| rule.intent).collect();
    assert_eq!(
        order,
        vec![Intent::AnalyzeScreen, Intent::RememberInfo, Intent::RecallInfo, Intent::ExportManual]
    );
}

#[test]
fn test_intent_names() {
    assert_eq!(Intent::AnalyzeScreen.to_string(), "analyze_screen");
    assert_eq!(serde_json::to_string(&Intent::GeneralQuery).unwrap(), "\"general_query\"");
}
