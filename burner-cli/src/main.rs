// SPDX-License-Identifier: GPL-3.0-only

//! burner-cli - inspect optical drives and media through the monitor
//!
//! `drives` and `media` run a one-shot enumeration (the pump over the
//! initial UDisks2 object set), `watch` stays subscribed and prints
//! hot-plug events as they arrive, `profiles` expands a request mask
//! without touching hardware.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt};

use burner_media::{MediumMonitor, MediumSelection, SharedMonitor, run};
use burner_types::{
    DriveType, DriveTypeFilter, MediaType, MediaTypeFilter, MonitorEvent, bytes_to_pretty,
    legal_profiles, media_set_from_str, media_set_to_string,
};
use burner_udisks::{UdisksProbe, UdisksSource};

#[derive(Debug, Parser)]
#[command(name = "burner-cli")]
#[command(about = "Inspect optical drives and media via the burner monitor")]
struct Args {
    /// Emit JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the drives currently visible to the monitor
    Drives {
        #[arg(long)]
        writers: bool,

        #[arg(long)]
        readers: bool,

        /// Include the image-file pseudo drive
        #[arg(long)]
        file: bool,
    },

    /// List the media currently inserted
    Media {
        #[arg(long)]
        writable: bool,

        #[arg(long)]
        rewritable: bool,

        #[arg(long)]
        data: bool,

        #[arg(long)]
        audio: bool,

        /// Include the image-file pseudo medium
        #[arg(long)]
        file: bool,

        #[arg(long)]
        any_in_recorder: bool,

        /// Restrict the other filters to CD media
        #[arg(long)]
        cd_only: bool,
    },

    /// Expand a media request mask into its legal concrete profiles
    Profiles {
        /// Attribute tokens, e.g. "dvd+plus+rewritable+blank"
        request: String,
    },

    /// Stay subscribed and print hot-plug events as they happen
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("burner_cli=info,burner_media=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Drives {
            writers,
            readers,
            file,
        } => {
            let mut filter = DriveTypeFilter::empty();
            if writers {
                filter |= DriveType::Writer;
            }
            if readers {
                filter |= DriveType::Reader;
            }
            if file {
                filter |= DriveType::File;
            }
            if filter.is_empty() {
                filter = DriveTypeFilter::all();
            }

            list_drives(filter, args.json).await
        }
        Command::Media {
            writable,
            rewritable,
            data,
            audio,
            file,
            any_in_recorder,
            cd_only,
        } => {
            let mut filter = MediaTypeFilter::empty();
            if writable {
                filter |= MediaType::Writable;
            }
            if rewritable {
                filter |= MediaType::Rewritable;
            }
            if data {
                filter |= MediaType::Data;
            }
            if audio {
                filter |= MediaType::Audio;
            }
            if file {
                filter |= MediaType::File;
            }
            if any_in_recorder {
                filter |= MediaType::AnyInRecorder;
            }
            if filter.is_empty() {
                filter = MediaTypeFilter::all() & !MediaTypeFilter::from(MediaType::CdOnly);
            }
            if cd_only {
                filter |= MediaType::CdOnly;
            }

            list_media(filter, args.json).await
        }
        Command::Profiles { request } => print_profiles(&request, args.json),
        Command::Watch => watch(args.json).await,
    }
}

/// Run the pump over the initial UDisks2 object set; the monitor is fully
/// populated once it returns.
async fn enumerate() -> Result<SharedMonitor> {
    let source = UdisksSource::new().await?;
    let probe = UdisksProbe::with_connection(source.connection().clone());
    let monitor: SharedMonitor = Arc::new(Mutex::new(MediumMonitor::new()));

    let initial = source.initial_notifications().await?;
    run(
        Arc::clone(&monitor),
        Arc::new(probe),
        futures::stream::iter(initial),
    )
    .await;

    Ok(monitor)
}

async fn list_drives(filter: DriveTypeFilter, json: bool) -> Result<()> {
    let monitor = enumerate().await?;
    let drives = monitor.lock().await.drives(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&drives)?);
        return Ok(());
    }

    println!("DEVICE                                    NAME                      WRITES");
    println!("--------------------------------------------------------------------------");
    for drive in &drives {
        println!(
            "{:<41} {:<25} {}",
            drive.device.as_deref().unwrap_or("-"),
            drive.display_name(),
            if drive.can_write { "yes" } else { "no" },
        );
    }

    Ok(())
}

async fn list_media(filter: MediaTypeFilter, json: bool) -> Result<()> {
    let monitor = enumerate().await?;
    let media = monitor.lock().await.media(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&media)?);
        return Ok(());
    }

    println!("DEVICE                                    STATUS                              FREE");
    println!("-----------------------------------------------------------------------------------");
    for medium in &media {
        println!(
            "{:<41} {:<35} {}",
            medium.device.as_deref().unwrap_or("-"),
            media_set_to_string(medium.status),
            bytes_to_pretty(&medium.free_bytes, false),
        );
    }

    Ok(())
}

fn print_profiles(request: &str, json: bool) -> Result<()> {
    let request = media_set_from_str(request)?;
    let profiles = legal_profiles(request);

    if json {
        let rendered: Vec<String> = profiles.iter().map(|p| media_set_to_string(*p)).collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    for profile in &profiles {
        println!("{}", media_set_to_string(*profile));
    }
    tracing::info!("{} legal profiles", profiles.len());

    Ok(())
}

async fn watch(json: bool) -> Result<()> {
    let source = UdisksSource::new().await?;
    let probe = UdisksProbe::with_connection(source.connection().clone());
    let monitor: SharedMonitor = Arc::new(Mutex::new(MediumMonitor::new()));

    // Track what a burning dialog would offer to record onto.
    let (mut events, mut selection) = {
        let mut monitor = monitor.lock().await;
        let events = monitor.subscribe();
        let selection = MediumSelection::new(&monitor, MediaType::Writable.into());
        (events, selection)
    };
    let mut selection_changes = selection.subscribe();
    let notifications = source.notifications().await?;

    let pump = tokio::spawn(run(
        Arc::clone(&monitor),
        Arc::new(probe),
        notifications,
    ));

    tracing::info!("watching for drive and medium changes, ctrl-c to stop");

    while let Some(event) = events.next().await {
        {
            let monitor = monitor.lock().await;
            selection.handle_monitor_event(&monitor, &event);
        }

        if json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }

        match &event {
            MonitorEvent::DriveAdded(drive) => {
                println!(
                    "drive added      {} ({})",
                    drive.display_name(),
                    drive.device.as_deref().unwrap_or("-"),
                );
            }
            MonitorEvent::DriveRemoved(drive) => {
                println!(
                    "drive removed    {} ({})",
                    drive.display_name(),
                    drive.device.as_deref().unwrap_or("-"),
                );
            }
            MonitorEvent::MediumInserted(medium) => {
                println!(
                    "medium inserted  {} in {}",
                    media_set_to_string(medium.status),
                    medium.device.as_deref().unwrap_or("-"),
                );
            }
            MonitorEvent::MediumRemoved(medium) => {
                println!(
                    "medium removed   {} from {}",
                    media_set_to_string(medium.status),
                    medium.device.as_deref().unwrap_or("-"),
                );
            }
        }

        while let Some(active) = selection_changes.try_recv() {
            match active {
                Some(medium) => println!(
                    "burn target      {} in {}",
                    media_set_to_string(medium.status),
                    medium.device.as_deref().unwrap_or("-"),
                ),
                None => {
                    if let Some(placeholder) = selection.placeholder() {
                        println!("burn target      {}", placeholder.label());
                    }
                }
            }
        }
    }

    pump.await?;
    Ok(())
}
