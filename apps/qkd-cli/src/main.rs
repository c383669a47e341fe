use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod seed;
mod util;

#[derive(Parser)]
#[command(
    name = "qkd",
    version,
    about = "BB84 session actor CLI (pedagogical, non-production)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a local actor store and config
    Init {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
        /// Shared session document path (same for every actor)
        #[arg(long)]
        session: PathBuf,
        /// Protocol role (sender or receiver)
        #[arg(long)]
        role: String,
        /// This actor's name (e.g. alice, bob, huot)
        #[arg(long)]
        actor: String,
        /// Default qubit count for prepare
        #[arg(long, default_value_t = 20)]
        qubits: usize,
        /// Simulate an eavesdropper on the channel for this actor's sessions
        #[arg(long, default_value_t = false)]
        eavesdropper: bool,
        /// Polling interval while awaiting the peer (ms)
        #[arg(long, default_value_t = 1000)]
        poll_interval_ms: u64,
        /// Bound on how long to await a stalled peer (ms)
        #[arg(long, default_value_t = 30_000)]
        max_wait_ms: u64,
    },
    /// Show session phase and public statistics
    Status {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Reset the shared session to its initial phase
    Reset {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Send the opening greeting to a partner (sender only)
    Greet {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
        /// Partner name to designate as receiver
        #[arg(long)]
        partner: String,
        /// Handshake message (defaults to a friendly opener)
        #[arg(long)]
        message: Option<String>,
    },
    /// Answer the sender's greeting (designated receiver only)
    Respond {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
        /// Decline for now; hands the session back to the sender
        #[arg(long, default_value_t = false)]
        not_ready: bool,
        /// Reply message
        #[arg(long)]
        message: Option<String>,
    },
    /// Generate the bit/basis sequences (sender only)
    Prepare {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
        /// Qubit count (defaults to the configured value)
        #[arg(long)]
        qubits: Option<usize>,
        /// Preparation strategy (random or manual)
        #[arg(long, default_value = "random")]
        method: String,
    },
    /// Send the prepared qubits through the channel (sender only)
    Transmit {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Measure the transmitted qubits (designated receiver only)
    Measure {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
        /// Measurement strategy (random or manual)
        #[arg(long, default_value = "random")]
        method: String,
    },
    /// Compare bases and keep the agreeing positions (either party)
    Sift {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Estimate the error rate and spend comparison bits (either party)
    CheckErrors {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Compress the surviving bits into the final key (either party)
    Distill {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Poll the shared session until it reaches one of the given phases
    Wait {
        /// Path to local store directory
        #[arg(long)]
        store: PathBuf,
        /// Target phase (repeatable), e.g. --phase sifting
        #[arg(long)]
        phase: Vec<String>,
        /// Override the configured wait bound (ms)
        #[arg(long)]
        max_wait_ms: Option<u64>,
    },
    /// One-time-pad encrypt a message with a distilled key
    Encrypt {
        /// Key as hex (from a completed session)
        #[arg(long)]
        key: String,
        /// Plaintext message
        #[arg(long)]
        text: String,
    },
    /// One-time-pad decrypt a ciphertext with a distilled key
    Decrypt {
        /// Key as hex (from a completed session)
        #[arg(long)]
        key: String,
        /// Ciphertext as hex
        #[arg(long)]
        cipher: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Init {
            store,
            session,
            role,
            actor,
            qubits,
            eavesdropper,
            poll_interval_ms,
            max_wait_ms,
        } => commands::init::run(
            &store,
            &session,
            &role,
            &actor,
            qubits,
            eavesdropper,
            poll_interval_ms,
            max_wait_ms,
        ),
        Command::Status { store } => commands::status::run(&store),
        Command::Reset { store } => commands::reset::run(&store),
        Command::Greet {
            store,
            partner,
            message,
        } => commands::greet::run(&store, &partner, message),
        Command::Respond {
            store,
            not_ready,
            message,
        } => commands::respond::run(&store, !not_ready, message),
        Command::Prepare {
            store,
            qubits,
            method,
        } => commands::prepare::run(&store, qubits, &method),
        Command::Transmit { store } => commands::transmit::run(&store),
        Command::Measure { store, method } => commands::measure::run(&store, &method),
        Command::Sift { store } => commands::sift::run(&store),
        Command::CheckErrors { store } => commands::check::run(&store),
        Command::Distill { store } => commands::distill::run(&store),
        Command::Wait {
            store,
            phase,
            max_wait_ms,
        } => commands::wait::run(&store, &phase, max_wait_ms),
        Command::Encrypt { key, text } => commands::otp::encrypt(&key, &text),
        Command::Decrypt { key, cipher } => commands::otp::decrypt(&key, &cipher),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
