use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the service-network event handlers workspace",
    long_about = "Packages the Lambda handler binaries and runs CI checks\n\
                  for the service-network event handlers workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and package every handler binary as a Lambda zip artifact
    ServerlessPackage {
        /// Lambda function architecture
        #[arg(value_enum, long, default_value_t = Architecture::X86_64)]
        arch: Architecture,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Package a single handler instead of all of them
        #[arg(long, value_enum)]
        handler: Option<Handler>,
        /// Directory receiving the zip artifacts
        #[arg(long, default_value = "dist", env = "LAMBDA_DIST_DIR")]
        dist_dir: String,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Unit and integration tests
    Test,
    /// Lint + test
    Check,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Handler {
    ServiceCreated,
    TopicTagger,
    SubscriptionBinder,
    DnsConfigurator,
    DiagnosticProbe,
}

impl Handler {
    const ALL: [Handler; 5] = [
        Self::ServiceCreated,
        Self::TopicTagger,
        Self::SubscriptionBinder,
        Self::DnsConfigurator,
        Self::DiagnosticProbe,
    ];

    fn bin_name(self) -> &'static str {
        match self {
            Self::ServiceCreated => "service_created_lambda",
            Self::TopicTagger => "topic_tagger_lambda",
            Self::SubscriptionBinder => "subscription_binder_lambda",
            Self::DnsConfigurator => "dns_configurator_lambda",
            Self::DiagnosticProbe => "diagnostic_probe_lambda",
        }
    }

    fn artifact_name(self) -> &'static str {
        match self {
            Self::ServiceCreated => "service_created.zip",
            Self::TopicTagger => "topic_tagger.zip",
            Self::SubscriptionBinder => "subscription_binder.zip",
            Self::DnsConfigurator => "dns_configurator.zip",
            Self::DiagnosticProbe => "diagnostic_probe.zip",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Architecture {
    #[value(name = "x86_64")]
    X86_64,
    Arm64,
}

impl Architecture {
    fn target_triple(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64-unknown-linux-gnu",
            Self::Arm64 => "aarch64-unknown-linux-gnu",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

// ── helpers ────────────────────────────────────────────────────────

type TaskResult = Result<(), String>;

fn banner(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> TaskResult {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .map_err(|error| format!("could not start cargo: {error}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("cargo {} exited with {status}", args[0]))
    }
}

fn package_serverless_lambdas(
    arch: Architecture,
    profile: BuildProfile,
    handler: Option<Handler>,
    dist_dir: &str,
) -> TaskResult {
    let target = arch.target_triple();
    require_installed_target(target)?;

    let handlers: Vec<Handler> = handler.map_or_else(|| Handler::ALL.to_vec(), |one| vec![one]);

    banner("Build handler binaries");
    let mut build_args = vec!["build", "-p", "lattice_events_lambda", "--target", target];
    if matches!(profile, BuildProfile::Release) {
        build_args.push("--release");
    }
    for handler in &handlers {
        build_args.extend(["--bin", handler.bin_name()]);
    }
    cargo(&build_args)?;

    banner("Zip bootstrap artifacts");
    let profile_dir = match profile {
        BuildProfile::Debug => "debug",
        BuildProfile::Release => "release",
    };
    let build_dir = Path::new("target").join(target).join(profile_dir);
    let dist_dir = Path::new(dist_dir);
    fs::create_dir_all(dist_dir)
        .map_err(|error| format!("cannot create {}: {error}", dist_dir.display()))?;

    for handler in handlers {
        let artifact = dist_dir.join(handler.artifact_name());
        write_bootstrap_zip(&build_dir.join(handler.bin_name()), &artifact)?;
        eprintln!("packaged {}", artifact.display());
    }
    Ok(())
}

/// Fails early with the `rustup` command to run when the Lambda target is
/// missing. A missing `rustup` only downgrades to a warning.
fn require_installed_target(target: &str) -> TaskResult {
    let output = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(_) | Err(_) => {
            eprintln!("warning: rustup unavailable, skipping target check for {target}");
            return Ok(());
        }
    };

    let installed = String::from_utf8_lossy(&output.stdout);
    if installed.lines().map(str::trim).any(|line| line == target) {
        Ok(())
    } else {
        Err(format!(
            "target {target} is not installed; run `rustup target add {target}`"
        ))
    }
}

/// Lambda's custom runtime expects a single executable named `bootstrap`.
fn write_bootstrap_zip(binary_path: &Path, zip_path: &Path) -> TaskResult {
    let binary = fs::read(binary_path)
        .map_err(|error| format!("cannot read {}: {error}", binary_path.display()))?;
    let file = fs::File::create(zip_path)
        .map_err(|error| format!("cannot create {}: {error}", zip_path.display()))?;

    let mut archive = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    let write_failed = |error: &dyn std::fmt::Display| {
        format!("cannot write {}: {error}", zip_path.display())
    };
    archive
        .start_file("bootstrap", options)
        .map_err(|error| write_failed(&error))?;
    archive
        .write_all(&binary)
        .map_err(|error| write_failed(&error))?;
    archive.finish().map_err(|error| write_failed(&error))?;
    Ok(())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() -> TaskResult {
    banner("Check formatting");
    cargo(&["fmt", "--all", "--", "--check"])?;

    banner("Clippy");
    cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

fn ci_test() -> TaskResult {
    banner("Test lattice_events_core");
    cargo(&["test", "-p", "lattice_events_core"])?;

    banner("Test lattice_events_lambda");
    cargo(&["test", "-p", "lattice_events_lambda"])
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Ci { job } => match job {
            CiJob::Lint => ci_lint(),
            CiJob::Test => ci_test(),
            CiJob::Check => ci_lint().and_then(|()| ci_test()),
        },
        Commands::ServerlessPackage {
            arch,
            profile,
            handler,
            dist_dir,
        } => package_serverless_lambdas(arch, profile, handler, &dist_dir),
    };

    if let Err(message) = outcome {
        eprintln!("error: {message}");
        exit(1);
    }
}
