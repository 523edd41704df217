use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use wordrank_engine::{
    load_or_default, EngineConfig, FileVocabulary, GameEngine, GuessResponse, InMemoryVectors,
    TdkDictionary, Vocabulary, WordGameError,
};

#[derive(Parser)]
#[command(name = "wordrank-cli")]
#[command(about = "WordRank semantic word game CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Word vectors in fastText/word2vec text format
    #[arg(short, long, default_value = "cc.tr.300.vec")]
    vectors: String,

    /// Vocabulary file (one word per line); defaults to the vector words
    #[arg(long)]
    vocab: Option<String>,

    /// Engine config (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Fix the hidden word instead of drawing one
    #[arg(long)]
    hidden_word: Option<String>,

    /// Load at most this many vectors
    #[arg(short, long)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one or more guesses
    Guess {
        /// Guessed words
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Show the word at a rank
    Hint {
        rank: usize,
    },

    /// List the closest words
    Closest {
        /// Number of words
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Print the hidden word
    Reveal,

    /// Interactive game on stdin
    Play,

    /// Look up dictionary meanings (TDK)
    Meaning {
        word: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Meanings need no round
    if let Commands::Meaning { word } = &cli.command {
        let engine = GameEngine::new(
            Arc::new(InMemoryVectors::new()),
            Vocabulary::default(),
            EngineConfig::default(),
        )
        .with_meaning_lookup(Arc::new(TdkDictionary::new()?));

        let response = engine.meanings(word).await;
        if let Some(error) = &response.error {
            println!("⚠️ Lookup failed: {}", error);
        } else if response.meanings.is_empty() {
            println!("No meanings found for {}", word);
        } else {
            println!("📖 {}:", word);
            for (i, meaning) in response.meanings.iter().enumerate() {
                println!("   {}. {}", i + 1, meaning);
            }
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    };
    let vectors = InMemoryVectors::load_text_file(&cli.vectors, cli.limit)?;
    let vocabulary = match &cli.vocab {
        Some(path) => load_or_default(&FileVocabulary::new(path)),
        None => Vocabulary::new(vectors.words().iter().cloned()),
    };

    let engine = GameEngine::new(Arc::new(vectors), vocabulary, config);
    let round = engine.start_round(cli.hidden_word.clone()).await?;
    println!("🎯 Round ready: {} words", round.total_words());

    match cli.command {
        Commands::Guess { words } => {
            for word in words {
                report_guess(&word, engine.submit_guess(&word).await);
            }
        }

        Commands::Hint { rank } => {
            let word = engine.hint(rank).await?;
            println!("💡 #{}: {}", rank, word);
        }

        Commands::Closest { limit } => {
            println!("📋 Closest words:");
            for entry in engine.closest_words(limit).await? {
                println!("   {:>5}. {} ({:.4})", entry.rank, entry.word, entry.similarity);
            }
        }

        Commands::Reveal => {
            println!("🔓 {}", engine.reveal().await?);
        }

        Commands::Play => {
            println!("Type a guess, `?N` for the word at rank N, `!` to give up.");
            let stdin = io::stdin();
            let mut attempts = 0usize;

            loop {
                print!("> ");
                io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let input = line.trim();

                if input.is_empty() {
                    continue;
                }
                if input == "!" {
                    println!("🔓 {}", engine.reveal().await?);
                    break;
                }
                if let Some(rank) = input.strip_prefix('?') {
                    match rank.trim().parse::<usize>() {
                        Ok(rank) => match engine.hint(rank).await {
                            Ok(word) => println!("💡 #{}: {}", rank, word),
                            Err(e) => println!("⚠️ {}", e),
                        },
                        Err(_) => println!("⚠️ Not a rank: {}", rank),
                    }
                    continue;
                }

                attempts += 1;
                let result = engine.submit_guess(input).await;
                let solved = matches!(&result, Ok(guess) if guess.is_correct);
                report_guess(input, result);

                if solved {
                    println!("🎉 Found in {} guesses!", attempts);
                    break;
                }
            }
        }

        // Answered before round setup
        Commands::Meaning { .. } => {}
    }

    Ok(())
}

fn report_guess(word: &str, result: Result<GuessResponse, WordGameError>) {
    match result {
        Ok(guess) if guess.is_correct => println!("✅ {} is the hidden word!", guess.matched),
        Ok(guess) => {
            let rank = guess
                .rank
                .map(|r| format!("#{}/{}", r, guess.total_words))
                .unwrap_or_else(|| "unranked".to_string());
            println!(
                "   {} → {}  distance {}  similarity {:.4}",
                word, rank, guess.distance, guess.similarity
            );
        }
        Err(WordGameError::WordNotFound { suggestions, .. }) if !suggestions.is_empty() => {
            println!("❓ {} not found. Did you mean: {}?", word, suggestions.join(", "));
        }
        Err(e) => println!("❓ {}", e),
    }
}
