use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fxgraph::{
    audio::MixGraphBuilder,
    config::Config,
    graph::{Compilation, GraphCompiler, StreamInputs, SyncPlan, DEFAULT_GLITCH_FILTER},
    render::{self, AdjustPlan, AudioLoopPlan, RenderCommand},
    EffectItem, EffectRegistry, FxGraphError,
};

#[derive(Parser)]
#[command(
    name = "fxgraph",
    version,
    about = "Compile video effect timelines into ffmpeg filter graphs",
    long_about = "fxgraph turns time-tagged effect items into a single ffmpeg filter_complex graph and runs ffmpeg with it."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply video effects over time windows
    Effects {
        input: PathBuf,
        output: PathBuf,

        /// Effect item "START END KIND [PARAMS...]" (repeatable, quote params with spaces)
        #[arg(short, long = "effect", value_name = "ITEM")]
        effects: Vec<String>,

        /// Secondary input read by overlay, dualoverlay and alphamerge (repeatable)
        #[arg(long = "overlay", value_name = "FILE")]
        overlays: Vec<PathBuf>,

        /// Media duration in seconds (probed with ffprobe when omitted)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Drop the input's audio instead of copying it
        #[arg(long)]
        no_audio: bool,

        /// Print the ffmpeg command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Mix external audio tracks into the video
    Mix {
        input: PathBuf,
        output: PathBuf,

        /// Track start time and file (repeatable)
        #[arg(long = "mix", num_args = 2, value_names = ["START", "FILE"])]
        tracks: Vec<String>,

        /// Print the ffmpeg command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Stretch a glitched lead-in to a musical cue, then splice in a segment
    Sync {
        input: PathBuf,
        output: PathBuf,

        /// Audio time (s) where the splice starts
        #[arg(long)]
        audio_cue: f64,

        /// Audio time (s) where the splice ends
        #[arg(long)]
        cue_end: f64,

        /// Source start (s) of the splice segment
        #[arg(long)]
        segment_start: f64,

        /// Source end (s) of the splice segment
        #[arg(long)]
        segment_end: f64,

        /// Filter chain for the lead-in
        #[arg(long, default_value = DEFAULT_GLITCH_FILTER)]
        glitch_filter: String,

        /// Print the ffmpeg command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Extract segments into separate files without re-encoding
    Split {
        input: PathBuf,

        /// Output directory for segment_N.mp4 files
        output: PathBuf,

        /// Segment start and end in seconds (repeatable)
        #[arg(long = "segment", num_args = 2, value_names = ["START", "END"])]
        segments: Vec<f64>,

        /// Print the ffmpeg commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Re-extract a segment from the original with adjusted boundaries
    Adjust {
        /// Original video file
        orig: PathBuf,
        output: PathBuf,

        /// Original start of the segment (s)
        #[arg(long)]
        orig_start: f64,

        /// Original end of the segment (s)
        #[arg(long)]
        orig_end: f64,

        /// Seconds added to the start (negative moves it earlier)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        start_offset: f64,

        /// Seconds added to the end (negative moves it earlier)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        end_offset: f64,

        /// Print the ffmpeg command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Cut the head of an audio file and append a looped section
    #[command(name = "audioprocess")]
    AudioProcess {
        input: PathBuf,
        output: PathBuf,

        /// Seconds kept from the start
        #[arg(long)]
        cut_duration: Option<f64>,

        /// Loop section start (s)
        #[arg(long)]
        loop_start: Option<f64>,

        /// Loop section end (s)
        #[arg(long)]
        loop_end: Option<f64>,

        /// Total length of the looped part (s)
        #[arg(long)]
        loop_total: Option<f64>,

        /// Print the ffmpeg commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// List effect kinds and their parameters
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging, RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    if let Err(e) = execute(cli.command, config).await {
        error!("{}", e);
        return Err(anyhow::anyhow!(e.user_message()));
    }
    Ok(())
}

async fn execute(command: Commands, mut config: Config) -> fxgraph::Result<()> {
    match command {
        Commands::Effects { input, output, effects, overlays, duration, no_audio, dry_run } => {
            if no_audio {
                config.render.keep_audio = false;
            }
            apply_effects(&config, &input, &overlays, &output, &effects, duration, dry_run).await
        }
        Commands::Mix { input, output, tracks, dry_run } => {
            mix_audio(&config, &input, &output, &tracks, dry_run).await
        }
        Commands::Sync {
            input,
            output,
            audio_cue,
            cue_end,
            segment_start,
            segment_end,
            glitch_filter,
            dry_run,
        } => {
            let plan = SyncPlan::new(audio_cue, cue_end, segment_start, segment_end)
                .with_glitch_filter(glitch_filter);
            let graph = plan.build(&StreamInputs::from_config(&config.compiler))?;
            let command = RenderCommand::sync(&config.render, &input, &output, &graph);
            finish(command, dry_run).await
        }
        Commands::Split { input, output, segments, dry_run } => {
            split_video(&config, &input, &output, &segments, dry_run).await
        }
        Commands::Adjust { orig, output, orig_start, orig_end, start_offset, end_offset, dry_run } => {
            let plan = AdjustPlan::new(orig_start, orig_end).with_offsets(start_offset, end_offset);
            let source_duration = render::probe_duration(&config.render, &orig).await?;
            let command = plan.command(&config.render, &orig, source_duration, &output)?;
            finish(command, dry_run).await
        }
        Commands::AudioProcess { input, output, cut_duration, loop_start, loop_end, loop_total, dry_run } => {
            let plan = AudioLoopPlan::from_parts(cut_duration, loop_start, loop_end, loop_total)?;
            process_audio(&config, &input, &output, plan, dry_run).await
        }
        Commands::Kinds => {
            list_kinds();
            Ok(())
        }
    }
}

async fn apply_effects(
    config: &Config,
    input: &Path,
    overlays: &[PathBuf],
    output: &Path,
    effects: &[String],
    duration: Option<f64>,
    dry_run: bool,
) -> fxgraph::Result<()> {
    let items: Vec<EffectItem> = effects.iter().map(|e| EffectItem::from(e.as_str())).collect();

    let duration = match duration {
        Some(duration) => duration,
        None => render::probe_duration(&config.render, input).await?,
    };
    info!("🎬 Compiling {} effect(s) over {:.2}s", items.len(), duration);

    let compiler = GraphCompiler::new(config.compiler.clone());
    let command = match compiler.compile(&items, duration)? {
        Compilation::Graph(graph) => {
            info!("   {} segment(s)", graph.segments().len());
            render::check_overlay_inputs(&graph, &config.compiler.overlay_input, overlays)?;
            RenderCommand::effects(&config.render, input, overlays, output, graph.as_str())
        }
        Compilation::CopyInput => {
            info!("   No effects to apply, copying input");
            RenderCommand::copy(&config.render, input, output)
        }
    };

    finish(command, dry_run).await
}

async fn mix_audio(
    config: &Config,
    input: &Path,
    output: &Path,
    tracks: &[String],
    dry_run: bool,
) -> fxgraph::Result<()> {
    let primary_has_audio = render::has_audio_stream(&config.render, input).await?;

    let mut builder = MixGraphBuilder::new(primary_has_audio);
    for pair in tracks.chunks(2) {
        let [start, file] = pair else {
            return Err(FxGraphError::generic("--mix takes START FILE pairs"));
        };
        let start: f64 = start
            .parse()
            .map_err(|_| FxGraphError::generic(format!("Invalid mix start time '{}'", start)))?;
        builder = builder.add(start, file.as_str());
    }

    builder.verify_inputs()?;
    let mix = builder.build()?;
    info!("🎵 Mixing {} track(s)", mix.inputs.len());

    let command = RenderCommand::mix(&config.render, input, output, &mix);
    finish(command, dry_run).await
}

async fn split_video(
    config: &Config,
    input: &Path,
    output_dir: &Path,
    segments: &[f64],
    dry_run: bool,
) -> fxgraph::Result<()> {
    let segments: Vec<(f64, f64)> = segments
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();

    let planned = render::split_segments(&config.render, input, output_dir, &segments)?;
    info!("✂️  Extracting {} segment(s)", planned.len());

    if !dry_run {
        tokio::fs::create_dir_all(output_dir).await?;
    }
    for segment in planned {
        finish(segment.command, dry_run).await?;
        if !dry_run {
            info!("   Segment {}: {} -> {}", segment.number, segment.window, segment.output.display());
        }
    }
    Ok(())
}

async fn process_audio(
    config: &Config,
    input: &Path,
    output: &Path,
    plan: Option<AudioLoopPlan>,
    dry_run: bool,
) -> fxgraph::Result<()> {
    let Some(plan) = plan else {
        info!("   No processing requested, copying {}", input.display());
        if dry_run {
            println!("cp {} {}", input.display(), output.display());
        } else {
            tokio::fs::copy(input, output).await?;
        }
        return Ok(());
    };

    let work_dir = std::env::temp_dir().join(format!("fxgraph_audio_{}", std::process::id()));
    let job = plan.job(&config.render, input, output, &work_dir)?;
    info!("🎵 Looping {}s of audio into {}s", plan.loop_duration(), plan.loop_total);

    if dry_run {
        for command in &job.commands {
            println!("{}", command);
        }
        return Ok(());
    }

    tokio::fs::create_dir_all(&work_dir).await?;
    tokio::fs::write(&job.concat_list_path, &job.concat_list).await?;
    let result = run_all(&job.commands).await;
    if let Err(e) = tokio::fs::remove_dir_all(&work_dir).await {
        warn!("Could not remove {}: {}", work_dir.display(), e);
    }
    result?;

    info!("✅ Processed audio saved to {}", output.display());
    Ok(())
}

async fn run_all(commands: &[RenderCommand]) -> fxgraph::Result<()> {
    for command in commands {
        render::run(command).await?;
    }
    Ok(())
}

async fn finish(command: RenderCommand, dry_run: bool) -> fxgraph::Result<()> {
    if dry_run {
        println!("{}", command);
        return Ok(());
    }

    render::run(&command).await?;
    info!("✅ Done");
    Ok(())
}

fn list_kinds() {
    let registry = EffectRegistry::new();
    for descriptor in registry.descriptors() {
        println!("{:<18} {}", descriptor.name, descriptor.description);
        println!("{:<18} usage: START END {}", "", descriptor.usage());
    }
}
