//! Random leftmost-first expansion of a grammar into a derivation tree.

use log::{debug, trace};

use crate::detokenize::join_tokens;
use crate::grammar::{Grammar, Rule};
use crate::tree::Tree;
use crate::utils::{GrammarError, OptionExt, Result, RuleChooser};

/// Configuration options for generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Maximum number of node expansions before giving up, `None` for no limit
    pub max_steps: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            max_steps: Some(100_000),
        }
    }
}

impl GeneratorConfig {
    /// Expand until done, even if that is never
    pub fn unbounded() -> Self {
        GeneratorConfig { max_steps: None }
    }

    pub fn with_max_steps(max_steps: usize) -> Self {
        GeneratorConfig {
            max_steps: Some(max_steps),
        }
    }
}

/// One node expansion, as seen by an observer
#[derive(Debug)]
pub struct ExpansionStep<'a> {
    /// 1-based count of expansions so far
    pub step: usize,
    /// The rule just applied
    pub rule: &'a Rule,
    /// The partially built tree, right after the expansion
    pub tree: &'a Tree,
}

impl ExpansionStep<'_> {
    /// Current yield, unexpanded non-terminals included
    pub fn tokens(&self) -> Vec<String> {
        self.tree.get_yield()
    }

    /// Current yield as text
    pub fn text(&self) -> String {
        join_tokens(&self.tokens())
    }
}

/// Gets told about every expansion step
pub trait ExpansionObserver {
    fn on_expand(&mut self, step: &ExpansionStep<'_>);
}

impl<F> ExpansionObserver for F
where
    F: FnMut(&ExpansionStep<'_>),
{
    fn on_expand(&mut self, step: &ExpansionStep<'_>) {
        self(step)
    }
}

/// Reports the intermediate text through `log`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ExpansionObserver for LogObserver {
    fn on_expand(&mut self, step: &ExpansionStep<'_>) {
        debug!("processing ... {}", step.text());
    }
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Generator { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Sample a tree rooted at the grammar's axiom
    pub fn generate<C: RuleChooser>(&self, grammar: &Grammar, chooser: &mut C) -> Result<Tree> {
        self.generate_observed(grammar, chooser, &mut |_: &ExpansionStep<'_>| {})
    }

    /// Like [`Generator::generate`], reporting every step to `observer`
    pub fn generate_observed<C, O>(
        &self,
        grammar: &Grammar,
        chooser: &mut C,
        observer: &mut O,
    ) -> Result<Tree>
    where
        C: RuleChooser,
        O: ExpansionObserver + ?Sized,
    {
        self.complete_observed(grammar, Tree::leaf(grammar.axiom()), chooser, observer)
    }

    /// Expand every leaf of `tree` that is not a terminal of `grammar`
    pub fn complete<C: RuleChooser>(
        &self,
        grammar: &Grammar,
        tree: Tree,
        chooser: &mut C,
    ) -> Result<Tree> {
        self.complete_observed(grammar, tree, chooser, &mut |_: &ExpansionStep<'_>| {})
    }

    pub fn complete_observed<C, O>(
        &self,
        grammar: &Grammar,
        mut tree: Tree,
        chooser: &mut C,
        observer: &mut O,
    ) -> Result<Tree>
    where
        C: RuleChooser,
        O: ExpansionObserver + ?Sized,
    {
        // Paths of nodes still to visit; the top of the stack is the leftmost.
        let mut stack = tree.leaf_paths();
        stack.reverse();
        let mut steps = 0;

        while let Some(path) = stack.pop() {
            let node = tree
                .node_mut(&path)
                .ok_or_grammar_err(|| format!("no node at {:?}", path))?;

            if grammar.is_terminal(node.label()) {
                continue;
            }
            if !grammar.is_non_terminal(node.label()) {
                return Err(GrammarError::UnknownSymbol(node.label().to_string()));
            }
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    return Err(GrammarError::StepLimitExceeded {
                        limit,
                        symbol: node.label().to_string(),
                    });
                }
            }

            let rules = grammar.rules_for(node.label())?;
            let rule = chooser
                .choose(rules.len())
                .and_then(|index| rules.get(index))
                .ok_or_else(|| GrammarError::EmptyRuleSet(node.label().to_string()))?;
            trace!("expanding with {}", rule);

            node.expand(rule.rhs().iter().map(Tree::leaf).collect());
            for index in (0..rule.rhs().len()).rev() {
                let mut child = path.clone();
                child.push(index);
                stack.push(child);
            }

            steps += 1;
            observer.on_expand(&ExpansionStep {
                step: steps,
                rule,
                tree: &tree,
            });
        }

        debug!(
            "derivation finished after {} steps, {} nodes",
            steps,
            tree.node_count()
        );
        Ok(tree)
    }
}
