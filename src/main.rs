//! Demo runner for the fork-join kernels.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use parmat::vector;
use parmat::{Fill, LogProgress, Matrix, MatmulError, Problem, Schedule, Team, WallClock};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "parmat", version, about = "Fork-join parallel loop demos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dense matrix multiplication, timed
    Multiply(MultiplyArgs),
    /// Element-wise vector add with dynamic chunked scheduling
    VectorAdd(VectorAddArgs),
    /// Vector add and multiply as two independent sections
    Sections(SectionsArgs),
    /// Every team member greets once
    Hello {
        #[arg(long)]
        threads: Option<i64>,
    },
}

#[derive(clap::Args)]
struct MultiplyArgs {
    #[arg(allow_negative_numbers = true)]
    threads: i64,
    #[arg(allow_negative_numbers = true)]
    rows_a: i64,
    #[arg(allow_negative_numbers = true)]
    cols_a: i64,
    #[arg(allow_negative_numbers = true)]
    rows_b: i64,
    #[arg(allow_negative_numbers = true)]
    cols_b: i64,
    #[arg(long, value_enum, default_value_t = ScheduleArg::Static)]
    schedule: ScheduleArg,
    /// Chunk size for the dynamic schedule
    #[arg(long, default_value_t = parmat::threaded::DEFAULT_CHUNK.get())]
    chunk: usize,
    #[arg(long, value_enum, default_value_t = FillArg::IndexSum)]
    fill: FillArg,
    /// Print the result matrix
    #[arg(long)]
    print: bool,
}

#[derive(clap::Args)]
struct VectorAddArgs {
    #[arg(long, default_value_t = 26)]
    len: usize,
    #[arg(long, default_value_t = 4)]
    threads: i64,
    #[arg(long, default_value_t = parmat::threaded::DEFAULT_CHUNK.get())]
    chunk: usize,
}

#[derive(clap::Args)]
struct SectionsArgs {
    #[arg(long, default_value_t = 50)]
    len: usize,
    #[arg(long, default_value_t = 2)]
    threads: i64,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScheduleArg {
    Static,
    Dynamic,
}

#[derive(Clone, Copy, ValueEnum)]
enum FillArg {
    Zeros,
    Ones,
    IndexSum,
    Identity,
}

impl From<FillArg> for Fill {
    fn from(arg: FillArg) -> Self {
        match arg {
            FillArg::Zeros => Fill::Zeros,
            FillArg::Ones => Fill::Ones,
            FillArg::IndexSum => Fill::IndexSum,
            FillArg::Identity => Fill::Identity,
        }
    }
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Multiply(_) => "multiply",
            Command::VectorAdd(_) => "vector-add",
            Command::Sections(_) => "sections",
            Command::Hello { .. } => "hello",
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let name = cli.command.name();

    let outcome = match cli.command {
        Command::Multiply(args) => run_multiply(&args),
        Command::VectorAdd(args) => run_vector_add(&args),
        Command::Sections(args) => run_sections(&args),
        Command::Hello { threads } => run_hello(threads),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\n\t\t Error: {}", err);
            eprintln!("\t\t {}", subcommand_usage(name));
            ExitCode::FAILURE
        }
    }
}

/// Usage line of one subcommand, e.g. `Usage: parmat sections [OPTIONS]`.
fn subcommand_usage(name: &str) -> String {
    let mut cli = Cli::command();
    cli.build();
    match cli.find_subcommand_mut(name) {
        Some(sub) => sub.render_usage().to_string(),
        None => cli.render_usage().to_string(),
    }
}

fn run_multiply(args: &MultiplyArgs) -> Result<(), MatmulError> {
    print_banner();
    println!("\t\t Threads        : {}", args.threads);
    println!("\t\t Matrix A Size  : {} X {}", args.rows_a, args.cols_a);
    println!("\t\t Matrix B Size  : {} X {}", args.rows_b, args.cols_b);

    let problem = Problem::from_dims(
        args.threads,
        args.rows_a,
        args.cols_a,
        args.rows_b,
        args.cols_b,
    )?;
    let schedule = match args.schedule {
        ScheduleArg::Static => Schedule::Static,
        ScheduleArg::Dynamic => Schedule::dynamic(args.chunk),
    };

    let timed = problem.run(args.fill.into(), schedule, &WallClock, &LogProgress::new("Result row"))?;

    if args.print {
        print_matrix("Result", &timed.value);
    }
    println!("\n\t\t Time in Seconds (T)        : {:.6} Seconds", timed.timing.seconds());
    println!("\n\t\t{}", ".".repeat(74));
    Ok(())
}

fn run_vector_add(args: &VectorAddArgs) -> Result<(), MatmulError> {
    let team = Team::from_signed(args.threads)?;
    println!("Number of threads = {}", team.size());

    let (a, b) = vector::chunk_demo_inputs(args.len);
    let c = vector::add(&a, &b, &team, Schedule::dynamic(args.chunk), &LogProgress::new("c"))?;

    for (i, value) in c.iter().enumerate() {
        println!("c[{}] = {:.6}", i, value);
    }
    Ok(())
}

fn run_sections(args: &SectionsArgs) -> Result<(), MatmulError> {
    let team = Team::from_signed(args.threads)?;
    println!("Number of threads = {}", team.size());

    let (a, b) = vector::sections_demo_inputs(args.len);
    let (c, d) = vector::add_and_multiply(&a, &b, &team, &LogProgress::new("c|d"))?;

    for (i, (sum, product)) in c.iter().zip(&d).enumerate() {
        println!("c[{}] = {:.6}  d[{}] = {:.6}", i, sum, i, product);
    }
    Ok(())
}

fn run_hello(threads: Option<i64>) -> Result<(), MatmulError> {
    let team = match threads {
        Some(n) => Team::from_signed(n)?,
        None => Team::available(),
    };
    // Greeting order across workers is unspecified.
    team.broadcast(|worker| println!("Welcome from thread {}", worker));
    Ok(())
}

fn print_banner() {
    let rule = "-".repeat(75);
    println!("\n\t\t{}", rule);
    println!("\t\t Objective : Dense Matrix Computations (Floating Point Operations)");
    println!("\t\t Matrix into Matrix Multiplication using a fork-join thread team");
    println!("\t\t{}", rule);
}

fn print_matrix(name: &str, m: &Matrix) {
    println!("\n\t\t {} ({}):", name, m.shape());
    for r in 0..m.rows() {
        let row: Vec<String> = m.row(r).iter().map(|v| format!("{:10.2}", v)).collect();
        println!("\t\t {}", row.join(" "));
    }
}
