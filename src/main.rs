use std::fs;
use std::path::PathBuf;

use cfg_sampler::{
    join_tokens, ExpansionStep, Generator, GeneratorConfig, Grammar, RandomChooser, Sample,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

/// Random sentences from context-free grammars
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a grammar file (.json, or one `<LHS> ::= [...]` rule per line)
    #[arg(help = "Path to the grammar file")]
    grammar_file: Option<PathBuf>,

    /// Use a built-in grammar instead of a file
    #[arg(short, long, value_enum, conflicts_with = "grammar_file")]
    builtin: Option<Builtin>,

    /// Start symbol (default: the one declared by the grammar)
    #[arg(short, long, value_name = "SYMBOL")]
    axiom: Option<String>,

    /// Number of samples per grammar
    #[arg(short = 'n', long, default_value_t = 3)]
    count: usize,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many expansions, 0 for no limit
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Print the text after every expansion step
    #[arg(short, long)]
    trace: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a built-in grammar to a file
    Export {
        #[arg(value_enum)]
        builtin: Builtin,

        /// Write JSON instead of rule lines
        #[arg(long)]
        json: bool,

        /// Output file path (default: stdout)
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Builtin {
    Toy,
    Weather,
}

impl From<Builtin> for Sample {
    fn from(builtin: Builtin) -> Self {
        match builtin {
            Builtin::Toy => Sample::Toy,
            Builtin::Weather => Sample::Weather,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Some(Commands::Export {
        builtin,
        json,
        output,
    }) = cli.command
    {
        let grammar = Sample::from(builtin).grammar()?;
        let rendered = if json {
            grammar.to_json()?
        } else {
            grammar.to_text()?
        };

        match output {
            Some(path) => {
                fs::write(&path, rendered)?;
                println!(
                    "Created {} grammar at: {}",
                    Sample::from(builtin).name(),
                    path.display()
                );
            }
            None => print!("{}", rendered),
        }
        return Ok(());
    }

    let grammars = match (&cli.grammar_file, cli.builtin) {
        (Some(path), _) => vec![Grammar::from_file(path, cli.axiom.as_deref())?],
        (None, Some(builtin)) => vec![with_axiom(Sample::from(builtin), cli.axiom.as_deref())?],
        (None, None) => {
            let tokens = ["My", "name", "is", "Bond", ",", "James", "Bond", "."];
            println!("{:?}", tokens);
            println!("{}", join_tokens(&tokens));
            println!();

            Sample::ALL
                .into_iter()
                .map(|sample| with_axiom(sample, cli.axiom.as_deref()))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let config = match cli.max_steps {
        0 => GeneratorConfig::unbounded(),
        limit => GeneratorConfig::with_max_steps(limit),
    };
    let generator = Generator::new(config);
    let mut chooser = match cli.seed {
        Some(seed) => RandomChooser::seeded(seed),
        None => RandomChooser::from_entropy(),
    };

    for grammar in &grammars {
        info!("sampling {} trees from axiom {}", cli.count, grammar.axiom());
        if cli.format == Format::Text {
            println!("grammar: {}", grammar);
            println!();
        }

        for _ in 0..cli.count {
            let tree = if cli.trace {
                generator.generate_observed(
                    grammar,
                    &mut chooser,
                    &mut |step: &ExpansionStep<'_>| println!("processing ... {}", step.text()),
                )?
            } else {
                generator.generate_observed(grammar, &mut chooser, &mut cfg_sampler::LogObserver)?
            };
            let tokens = tree.get_yield();
            let text = join_tokens(&tokens);

            match cli.format {
                Format::Text => {
                    println!("sampled tree: {}", tree);
                    println!("yield: {:?}", tokens);
                    println!("text: {}", text);
                    println!();
                }
                Format::Json => {
                    let record = serde_json::json!({
                        "axiom": grammar.axiom(),
                        "tree": tree,
                        "yield": tokens,
                        "text": text,
                    });
                    println!("{}", serde_json::to_string(&record)?);
                }
            }
        }
    }

    Ok(())
}

fn with_axiom(sample: Sample, axiom: Option<&str>) -> cfg_sampler::Result<Grammar> {
    Grammar::new(sample.rules(), axiom.unwrap_or(sample.axiom()))
}
