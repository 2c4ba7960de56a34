// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line interface for the `clipline` binary.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clipline_editor_media::{detect_with_params, extract_audio, import_video_file, VideoFile};
use clipline_editor_timeline::{
    animation_factory_list, generate_smart_zoom_animation, ClipId, Easing, FactoryInfo, Region, ShotPreset,
    SmartZoomOptions, SHOT_PRESETS,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::actions::editor_actions_schema;
use crate::config::{EditorConfig, CONFIG_FILE_NAME};
use crate::export::{effective_animation, render_plan};
use crate::project::ProjectFile;
use crate::state::TimelineState;

/// Clipline timeline editor
#[derive(Debug, Parser)]
#[command(name = "clipline", author, version, about, long_about = None)]
pub struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a video into a new project
    Import {
        /// Video file
        video: PathBuf,
        /// Project file to create
        #[arg(short, long)]
        output: PathBuf,
        /// Default preset for the timeline
        #[arg(long)]
        preset: Option<String>,
    },

    /// Detect silent regions in a video's audio
    Silence {
        /// Video file
        video: PathBuf,
        /// Project to attach the regions to
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Apply a JSON action batch to a project
    Apply {
        /// Project file
        project: PathBuf,
        /// JSON file holding `{"actions": [...]}`
        actions: PathBuf,
        /// Where to write the render plan if the batch requests an export
        #[arg(long)]
        plan: Option<PathBuf>,
    },

    /// Print a clip's animated values at a time
    Evaluate {
        /// Project file
        project: PathBuf,
        /// Clip ID
        #[arg(long)]
        clip: String,
        /// Seconds into the clip
        #[arg(long)]
        time: f64,
    },

    /// Generate a smart zoom toward a region of a clip
    SmartZoom {
        /// Project file
        project: PathBuf,
        /// Clip ID
        #[arg(long)]
        clip: String,
        /// Region centre, horizontal percent
        #[arg(long, default_value_t = 50.0)]
        x: f64,
        /// Region centre, vertical percent
        #[arg(long, default_value_t = 50.0)]
        y: f64,
        /// Peak zoom
        #[arg(long, default_value_t = 1.5)]
        zoom: f64,
        /// Normalized start of the move
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        /// Normalized end of the move
        #[arg(long, default_value_t = 1.0)]
        end: f64,
    },

    /// List animation and shot presets
    Presets,

    /// Print the JSON Schema for action batches
    Schema,

    /// Write the render plan for a project
    Export {
        /// Project file
        project: PathBuf,
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
        /// Output frame rate
        #[arg(long)]
        fps: Option<f64>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetListing {
    animations: Vec<FactoryInfo>,
    shots: &'static [ShotPreset],
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let config = EditorConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    match cli.command {
        Command::Import { video, output, preset } => import(&config, &video, &output, preset).await,
        Command::Silence { video, store } => silence(&config, &video, store.as_deref()).await,
        Command::Apply { project, actions, plan } => apply(&config, &project, &actions, plan.as_deref()),
        Command::Evaluate { project, clip, time } => evaluate(&project, &clip, time),
        Command::SmartZoom {
            project,
            clip,
            x,
            y,
            zoom,
            start,
            end,
        } => {
            let options = SmartZoomOptions {
                target_region: Region {
                    x,
                    y,
                    ..Region::default()
                },
                start_time: start,
                end_time: end,
                easing: Easing::EaseInOut,
                zoom_level: zoom,
            };
            smart_zoom(&project, &clip, &options)
        }
        Command::Presets => print_json(&PresetListing {
            animations: animation_factory_list(),
            shots: SHOT_PRESETS,
        }),
        Command::Schema => print_json(&editor_actions_schema()),
        Command::Export { project, output, fps } => {
            let project = load_project(&project)?;
            let plan = render_plan(&project.timeline, fps.unwrap_or(config.export.fps))?;
            write_json(&output, &plan)
        }
    }
}

async fn import(config: &EditorConfig, video: &Path, output: &Path, preset: Option<String>) -> Result<()> {
    let file = VideoFile::from_path(video)?;
    let probe = config.probe()?;
    let source = import_video_file(&file, &probe, &config.import_limits())
        .await
        .with_context(|| format!("Failed to import {}", video.display()))?;

    let timeline = TimelineState::from_import(source, preset);
    ProjectFile::new(timeline).save(output)?;
    println!("Created {}", output.display());
    Ok(())
}

async fn silence(config: &EditorConfig, video: &Path, store: Option<&Path>) -> Result<()> {
    let options = config.audio_options()?;
    let audio = extract_audio(video, &options)
        .await
        .with_context(|| format!("Failed to decode audio from {}", video.display()))?;
    let regions = detect_with_params(&audio, &config.silence_params());

    if let Some(path) = store {
        let mut project = load_project(path)?;
        project.timeline.silent_regions = regions.clone();
        project.save(path)?;
        info!("Stored {} silent regions in {}", regions.len(), path.display());
    }
    print_json(&regions)
}

fn apply(config: &EditorConfig, project_path: &Path, actions: &Path, plan: Option<&Path>) -> Result<()> {
    let json = std::fs::read_to_string(actions).with_context(|| format!("Failed to read {}", actions.display()))?;
    let mut store = load_project(project_path)?.into_store(config.history.max_depth);

    let report = store.apply_json(&json).context("Action batch rejected")?;

    if report.export_requested {
        match plan {
            Some(path) => write_json(path, &render_plan(store.state(), config.export.fps)?)?,
            None => info!("Export requested; pass --plan to write the render plan"),
        }
    }

    ProjectFile::new(store.into_state()).save(project_path)?;
    print_json(&report)
}

fn evaluate(project: &Path, clip_id: &str, time: f64) -> Result<()> {
    let project = load_project(project)?;
    let timeline = &project.timeline;
    let Some(clip) = timeline.clip(&ClipId::from(clip_id)) else {
        bail!("Clip not found: {clip_id}");
    };

    let values = effective_animation(clip, timeline.preset_id.as_deref())
        .map(|animation| animation.evaluate(time, clip.playback_duration()))
        .unwrap_or_default();
    print_json(&values)
}

fn smart_zoom(project_path: &Path, clip_id: &str, options: &SmartZoomOptions) -> Result<()> {
    let mut project = load_project(project_path)?;
    let Some(clip) = project.timeline.clip_mut(&ClipId::from(clip_id)) else {
        bail!("Clip not found: {clip_id}");
    };
    clip.animation = Some(generate_smart_zoom_animation(options));
    project.save(project_path)?;
    println!("Added smart zoom to {clip_id}");
    Ok(())
}

fn load_project(path: &Path) -> Result<ProjectFile> {
    ProjectFile::load(path).with_context(|| format!("Failed to open project {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
