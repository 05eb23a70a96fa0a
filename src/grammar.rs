use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::generator::Generator;
use crate::tree::Tree;
use crate::utils::{GrammarError, OptionExt, Result, RuleChooser};

/// A production rule: one left-hand side rewritten into a sequence of symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    lhs: String,
    rhs: Vec<String>,
}

impl Rule {
    pub fn new<I>(lhs: impl Into<String>, rhs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Rule {
            lhs: lhs.into(),
            rhs: rhs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    pub fn rhs(&self) -> &[String] {
        &self.rhs
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.lhs, self.rhs)
    }
}

/// On-disk JSON shape of a grammar
#[derive(Debug, Serialize, Deserialize)]
struct GrammarDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    axiom: Option<String>,
    rules: Vec<Rule>,
}

/// A context-free grammar with its derived symbol classification.
///
/// A symbol is a non-terminal iff it is the left-hand side of some rule,
/// and a terminal iff it appears in a right-hand side without being a
/// left-hand side anywhere. The indices are read-only once built.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// Rules in definition order
    rules: Vec<Rule>,
    /// The starting symbol for generation
    axiom: String,
    /// Rules grouped by left-hand side, definition order kept
    lhs_to_rules: HashMap<String, Vec<Rule>>,
    non_terminals: BTreeSet<String>,
    terminals: BTreeSet<String>,
}

impl Grammar {
    /// Build a grammar and its indices.
    ///
    /// Fails if the axiom has no rule, or if a rule rewrites into nothing.
    pub fn new(rules: Vec<Rule>, axiom: impl Into<String>) -> Result<Self> {
        let axiom = axiom.into();
        let mut lhs_to_rules: HashMap<String, Vec<Rule>> = HashMap::new();
        let mut non_terminals = BTreeSet::new();

        for rule in &rules {
            if rule.rhs.is_empty() {
                return Err(GrammarError::InvalidGrammar(format!(
                    "rule for {} has an empty right-hand side",
                    rule.lhs
                )));
            }
            non_terminals.insert(rule.lhs.clone());
            lhs_to_rules
                .entry(rule.lhs.clone())
                .or_default()
                .push(rule.clone());
        }

        // Only once every left-hand side is known can the rest be terminals.
        let terminals: BTreeSet<String> = rules
            .iter()
            .flat_map(|rule| rule.rhs.iter())
            .filter(|symbol| !non_terminals.contains(*symbol))
            .cloned()
            .collect();

        if !non_terminals.contains(&axiom) {
            return Err(GrammarError::InvalidAxiom(axiom));
        }

        debug!(
            "grammar with {} rules, {} non-terminals, {} terminals, axiom {}",
            rules.len(),
            non_terminals.len(),
            terminals.len(),
            axiom
        );

        Ok(Grammar {
            rules,
            axiom,
            lhs_to_rules,
            non_terminals,
            terminals,
        })
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    /// All rules rewriting `symbol`, in definition order
    pub fn rules_for(&self, symbol: &str) -> Result<&[Rule]> {
        let rules = self
            .lhs_to_rules
            .get(symbol)
            .ok_or_else(|| GrammarError::UnknownSymbol(symbol.to_string()))?;

        if rules.is_empty() {
            return Err(GrammarError::EmptyRuleSet(symbol.to_string()));
        }
        Ok(rules)
    }

    /// Sample a derivation tree with the default generator settings
    pub fn generate<C: RuleChooser>(&self, chooser: &mut C) -> Result<Tree> {
        Generator::default().generate(self, chooser)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn terminals(&self) -> &BTreeSet<String> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &BTreeSet<String> {
        &self.non_terminals
    }

    /// Load a grammar, JSON if the extension says so, the rule-line format otherwise.
    ///
    /// An explicit `axiom` wins over one declared in the file.
    pub fn from_file<P: AsRef<Path>>(path: P, axiom: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!("loading grammar from {}", path.display());

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text, axiom),
            _ => Self::from_text(&text, axiom),
        }
    }

    /// Parse the JSON form: `{"axiom": "S", "rules": [{"lhs": "S", "rhs": ["a"]}]}`
    pub fn from_json_str(text: &str, axiom: Option<&str>) -> Result<Self> {
        let definition: GrammarDefinition = serde_json::from_str(text)?;
        let axiom = match (axiom, definition.axiom) {
            (Some(axiom), _) => axiom.to_string(),
            (None, Some(declared)) => declared,
            (None, None) => first_lhs(&definition.rules)?,
        };
        Self::new(definition.rules, axiom)
    }

    /// Parse the rule-line form.
    ///
    /// ```text
    /// # comment
    /// @axiom <S>
    /// <S> ::= ["NP", "VP", "."]
    /// <NP> ::= ["Jamy"]
    /// ```
    ///
    /// Without an `@axiom` line the first rule's left-hand side is the axiom.
    pub fn from_text(text: &str, axiom: Option<&str>) -> Result<Self> {
        let rule_regex = compile(r"^<([^>]+)>\s*::=\s*\[(.*)\]$")?;
        let axiom_regex = compile(r"^@axiom\s+<([^>]+)>$")?;
        let symbol_regex = compile(r#""[^"]*""#)?;

        let mut rules = Vec::new();
        let mut declared_axiom = None;

        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();

            // Skip empty lines and comments
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(captures) = axiom_regex.captures(trimmed) {
                declared_axiom = Some(captures[1].to_string());
                continue;
            }

            let captures = rule_regex.captures(trimmed).ok_or_else(|| {
                GrammarError::Parse(format!(
                    "line {}: expected `<LHS> ::= [\"symbol\", ...]`",
                    index + 1
                ))
            })?;
            let rhs = parse_symbols(&captures[2], &symbol_regex)
                .map_err(|msg| GrammarError::Parse(format!("line {}: {}", index + 1, msg)))?;
            rules.push(Rule::new(&captures[1], rhs));
        }

        let axiom = match (axiom, declared_axiom) {
            (Some(axiom), _) => axiom.to_string(),
            (None, Some(declared)) => declared,
            (None, None) => first_lhs(&rules)?,
        };
        Self::new(rules, axiom)
    }

    /// Render in the rule-line form accepted by [`Grammar::from_text`]
    pub fn to_text(&self) -> Result<String> {
        let mut out = format!("@axiom <{}>\n", self.axiom);

        for rule in &self.rules {
            check_exportable(&rule.lhs, &['>', '"', '\n'])?;
            let mut symbols = Vec::with_capacity(rule.rhs.len());
            for symbol in &rule.rhs {
                check_exportable(symbol, &['"', '\n'])?;
                symbols.push(format!("\"{}\"", symbol));
            }
            out.push_str(&format!("<{}> ::= [{}]\n", rule.lhs, symbols.join(", ")));
        }

        Ok(out)
    }

    /// Render in the JSON form accepted by [`Grammar::from_json_str`]
    pub fn to_json(&self) -> Result<String> {
        let definition = GrammarDefinition {
            axiom: Some(self.axiom.clone()),
            rules: self.rules.clone(),
        };
        Ok(serde_json::to_string_pretty(&definition)?)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<String> = self.rules.iter().map(ToString::to_string).collect();
        write!(
            f,
            "CFG({:?}, {:?}, [{}], {})",
            self.terminals,
            self.non_terminals,
            rules.join(", "),
            self.axiom
        )
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| GrammarError::Parse(e.to_string()))
}

fn first_lhs(rules: &[Rule]) -> Result<String> {
    rules
        .first()
        .map(|rule| rule.lhs.clone())
        .ok_or_grammar_err(|| "grammar defines no rules".to_string())
}

/// Split `"a", "b c"` into its quoted symbols
fn parse_symbols(body: &str, symbol_regex: &Regex) -> std::result::Result<Vec<String>, String> {
    let is_separator = |gap: &str| gap.chars().all(|c| c == ',' || c.is_whitespace());
    let mut symbols = Vec::new();
    let mut last_end = 0;

    for quoted in symbol_regex.find_iter(body) {
        if !is_separator(&body[last_end..quoted.start()]) {
            return Err(format!(
                "unquoted text before {}",
                quoted.as_str()
            ));
        }
        let text = quoted.as_str();
        symbols.push(text[1..text.len() - 1].to_string());
        last_end = quoted.end();
    }

    if !is_separator(&body[last_end..]) {
        return Err(format!("unexpected trailing text `{}`", body[last_end..].trim()));
    }
    if symbols.is_empty() {
        return Err("empty right-hand side".to_string());
    }
    Ok(symbols)
}

fn check_exportable(symbol: &str, forbidden: &[char]) -> Result<()> {
    if symbol.contains(forbidden) {
        return Err(GrammarError::InvalidGrammar(format!(
            "symbol {:?} cannot be written as a rule line",
            symbol
        )));
    }
    Ok(())
}

/// Builder for constructing Grammar instances
pub struct GrammarBuilder {
    axiom: String,
    rules: Vec<Rule>,
}

impl GrammarBuilder {
    pub fn new(axiom: &str) -> Self {
        GrammarBuilder {
            axiom: axiom.to_string(),
            rules: Vec::new(),
        }
    }

    /// Add a rule to the grammar
    pub fn rule(mut self, lhs: &str, rhs: &[&str]) -> Self {
        self.rules.push(Rule::new(lhs, rhs.iter().copied()));
        self
    }

    /// Build the grammar
    pub fn build(self) -> Result<Grammar> {
        Grammar::new(self.rules, self.axiom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::SequenceChooser;
    use pretty_assertions::assert_eq;

    fn small() -> Grammar {
        GrammarBuilder::new("S")
            .rule("S", &["A", "B"])
            .rule("A", &["a"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_classification() {
        let grammar = small();
        assert!(grammar.is_non_terminal("S"));
        assert!(grammar.is_non_terminal("A"));
        assert!(grammar.is_terminal("B"));
        assert!(grammar.is_terminal("a"));
        assert!(!grammar.is_terminal("A"));
        assert!(!grammar.is_terminal("Z"));
        assert!(!grammar.is_non_terminal("Z"));
    }

    #[test]
    fn test_recursive_symbol_is_never_terminal() {
        // `A` shows up on a right-hand side before its own rule is defined
        let grammar = GrammarBuilder::new("S")
            .rule("S", &["A", "S"])
            .rule("S", &["x"])
            .rule("A", &["y"])
            .build()
            .unwrap();
        assert!(!grammar.is_terminal("A"));
        assert!(!grammar.is_terminal("S"));
        let terminals: Vec<&str> = grammar.terminals().iter().map(String::as_str).collect();
        assert_eq!(terminals, vec!["x", "y"]);
    }

    #[test]
    fn test_rules_for_keeps_order() {
        let grammar = GrammarBuilder::new("S")
            .rule("S", &["one"])
            .rule("T", &["other"])
            .rule("S", &["two"])
            .rule("S", &["three"])
            .build()
            .unwrap();
        let alternatives: Vec<&str> = grammar
            .rules_for("S")
            .unwrap()
            .iter()
            .map(|rule| rule.rhs()[0].as_str())
            .collect();
        assert_eq!(alternatives, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_rules_for_terminal_fails() {
        let grammar = small();
        assert!(matches!(
            grammar.rules_for("B"),
            Err(GrammarError::UnknownSymbol(symbol)) if symbol == "B"
        ));
    }

    #[test]
    fn test_axiom_without_rules_is_rejected() {
        let result = GrammarBuilder::new("Missing").rule("S", &["a"]).build();
        assert!(matches!(result, Err(GrammarError::InvalidAxiom(axiom)) if axiom == "Missing"));

        let result = GrammarBuilder::new("a").rule("S", &["a"]).build();
        assert!(matches!(result, Err(GrammarError::InvalidAxiom(_))));
    }

    #[test]
    fn test_empty_right_hand_side_is_rejected() {
        let result = Grammar::new(vec![Rule::new("S", Vec::<String>::new())], "S");
        assert!(matches!(result, Err(GrammarError::InvalidGrammar(_))));
    }

    #[test]
    fn test_display() {
        let grammar = small();
        assert_eq!(
            grammar.to_string(),
            r#"CFG({"B", "a"}, {"A", "S"}, [S -> ["A", "B"], A -> ["a"]], S)"#
        );
    }

    #[test]
    fn test_generate_keeps_terminal_without_rule() {
        let grammar = small();
        let tree = grammar.generate(&mut SequenceChooser::first()).unwrap();
        assert_eq!(tree.get_yield(), vec!["a", "B"]);
    }

    #[test]
    fn test_parse_text() {
        let input = r#"
            # toy grammar
            <S> ::= ["NP", "VP", " ?"]
            <NP> ::= ["Jamy"]
            <NP>::=["Sabine","Jamy"]
            <VP> ::= ["reads"]
        "#;
        let grammar = Grammar::from_text(input, None).unwrap();
        assert_eq!(grammar.axiom(), "S");
        assert_eq!(grammar.rules().len(), 4);
        assert_eq!(grammar.rules()[0], Rule::new("S", ["NP", "VP", " ?"]));
        assert_eq!(grammar.rules()[2], Rule::new("NP", ["Sabine", "Jamy"]));
    }

    #[test]
    fn test_parse_text_axiom_directive() {
        let input = "<A> ::= [\"a\"]\n@axiom <S>\n<S> ::= [\"A\", \"A\"]\n";
        assert_eq!(Grammar::from_text(input, None).unwrap().axiom(), "S");
        assert_eq!(Grammar::from_text(input, Some("A")).unwrap().axiom(), "A");
    }

    #[test]
    fn test_parse_text_errors() {
        let unquoted = Grammar::from_text("<S> ::= [\"a\", b]", None);
        assert!(matches!(unquoted, Err(GrammarError::Parse(msg)) if msg.starts_with("line 1")));

        let empty = Grammar::from_text("\n<S> ::= []", None);
        assert!(matches!(empty, Err(GrammarError::Parse(msg)) if msg.contains("line 2")));

        let garbage = Grammar::from_text("S -> a", None);
        assert!(matches!(garbage, Err(GrammarError::Parse(_))));

        let nothing = Grammar::from_text("# only a comment", None);
        assert!(matches!(nothing, Err(GrammarError::InvalidGrammar(_))));
    }

    #[test]
    fn test_text_export_round_trip() {
        let grammar = GrammarBuilder::new("S")
            .rule("A", &["In the morning", ","])
            .rule("S", &["A", " ?"])
            .build()
            .unwrap();
        let reloaded = Grammar::from_text(&grammar.to_text().unwrap(), None).unwrap();
        assert_eq!(reloaded.axiom(), "S");
        assert_eq!(reloaded.rules(), grammar.rules());
    }

    #[test]
    fn test_text_export_rejects_quotes() {
        let grammar = GrammarBuilder::new("S").rule("S", &["say \"hi\""]).build().unwrap();
        assert!(matches!(grammar.to_text(), Err(GrammarError::InvalidGrammar(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let grammar = small();
        let json = grammar.to_json().unwrap();
        let reloaded = Grammar::from_json_str(&json, None).unwrap();
        assert_eq!(reloaded.axiom(), "S");
        assert_eq!(reloaded.rules(), grammar.rules());
    }

    #[test]
    fn test_json_without_axiom_uses_first_rule() {
        let json = r#"{"rules": [{"lhs": "T", "rhs": ["t"]}, {"lhs": "S", "rhs": ["T"]}]}"#;
        assert_eq!(Grammar::from_json_str(json, None).unwrap().axiom(), "T");
        assert!(matches!(
            Grammar::from_json_str("{\"rules\": 3}", None),
            Err(GrammarError::Json(_))
        ));
    }
}
