// SPDX-License-Identifier: MIT

//! hive-sandbox: a small demo binary that drives [`hive_kernel::Kernel`]
//! across a handful of ticks against an in-memory [`hive_host::FakeHostContext`],
//! printing the resulting `stats` snapshot after each one.
//!
//! This has no real host binding behind it (spec.md §1 non-goals); it
//! exists so the kernel's tick pipeline can be exercised end to end
//! without a real game world.

use clap::Parser;
use hive_core::{KernelConfig, RoomView, SpawnView, WorkerView};
use hive_host::FakeHostContext;
use hive_kernel::Kernel;
use hive_storage::DurableRoot;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "hive-sandbox", about = "Run the kernel for a number of ticks against a fake host")]
struct Cli {
    /// Number of ticks to run.
    #[arg(long, default_value_t = 5)]
    ticks: u32,

    /// Number of worker creeps present from the first non-respawn tick.
    #[arg(long, default_value_t = 3)]
    workers: u32,

    /// CPU limit reported by the fake host each tick.
    #[arg(long, default_value_t = 20.0)]
    cpu_limit: f64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();

    let cli = Cli::parse();
    let host = FakeHostContext::new().with_cpu(0.0, cli.cpu_limit, 10_000).with_spawns(vec![SpawnView {
        id: "spawn1".into(),
        room_id: Some("W1N1".into()),
        spawning: false,
    }]);
    let mut kernel = Kernel::new(KernelConfig::default());
    let mut root = DurableRoot::wrap(serde_json::Value::Null).unwrap_or_default();

    for tick in 1..=cli.ticks {
        if tick > 1 {
            host.set_workers(
                (0..cli.workers)
                    .map(|n| WorkerView {
                        id: format!("worker-{n}"),
                        role: "harvester".into(),
                        room_id: Some("W1N1".into()),
                    })
                    .collect(),
            );
        }
        host.set_rooms(vec![RoomView {
            id: "W1N1".into(),
            energy_available: 150,
            energy_capacity_available: 300,
            controller_level: Some(2),
        }]);

        let report = kernel.run_tick(&host, &mut root);
        println!(
            "tick {tick}: respawn={} emergency={} init_complete={} creeps={}",
            report.respawn_detected, report.emergency_triggered, report.init_complete, report.snapshot.creeps.count
        );

        host.advance_tick();
    }
}
