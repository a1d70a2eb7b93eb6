use std::f64::consts::FRAC_PI_2;

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use launch_optimizer::optimizer::{Optimizer, OptimizerConfig};
use launch_optimizer::sim::{Frame, RunSummary, SimConfig, System};
use launch_optimizer::vehicle::presets;
use launch_optimizer::{Planetoid, Program};

fn main() -> anyhow::Result<()> {
    let kerbin = Planetoid::kerbin();
    let cutoff_radius = kerbin.radius + 75_000.0;
    let throttle = Program::from_pairs(&[(0.0, 1.0), (20_000.0, 1.0), (40_000.0, 1.0)])?;
    let altitude_angle = Program::from_pairs(&[
        (0.0, FRAC_PI_2),
        (5_000.0, 1.1),
        (15_000.0, 0.7),
        (30_000.0, 0.3),
        (50_000.0, 0.0),
    ])?;
    let sim_config = SimConfig { delta_t: 0.02, ..SimConfig::default() };

    let mut optimizer = Optimizer::new(
        || presets::orbiter(&kerbin),
        &kerbin,
        throttle,
        altitude_angle,
        cutoff_radius,
        OptimizerConfig { seed: Some(1), ..OptimizerConfig::default() },
    )
    .with_sim_config(sim_config.clone());
    let outcome = optimizer.run(20)?;

    let mut frames = Vec::new();
    let mut system = System::new(
        presets::orbiter(&kerbin),
        &kerbin,
        &outcome.throttle_program,
        &outcome.altitude_angle_program,
        sim_config,
    )
    .with_throttle_cutoff_radius(cutoff_radius);
    system.run_with(|f| frames.push(f.clone()))?;

    let app = AscentViz {
        frames,
        summary: system.summary(),
        fitness: outcome.fitness,
        planet_radius: kerbin.radius,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Launch Optimizer", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("{e}"))
}

struct AscentViz {
    frames: Vec<Frame>,
    summary: RunSummary,
    fitness: f64,
    planet_radius: f64,
}

impl eframe::App for AscentViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.frames.len() / 2000).max(1);
        let sampled: Vec<&Frame> = self.frames.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Best ascent");
            ui.label(format!(
                "Apex: {:.1} km  |  Fitness: {:.1} m/s  |  State: {:?}  |  Flight: {:.0} s",
                self.summary.statistics.max_altitude() / 1000.0,
                self.fitness,
                self.summary.state,
                self.summary.mission_time,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Altitude (km)");
                    let points: PlotPoints = sampled.iter()
                        .map(|f| [f.time, f.altitude / 1000.0])
                        .collect();
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Velocity (m/s)");
                    let horizontal: PlotPoints = sampled.iter()
                        .map(|f| [f.time, f.horizontal_velocity.abs()])
                        .collect();
                    let radial: PlotPoints = sampled.iter()
                        .map(|f| [f.time, f.radial_velocity])
                        .collect();
                    Plot::new("velocity")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Horizontal", horizontal));
                            plot_ui.line(Line::new("Radial", radial));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Guidance");
                    let angle: PlotPoints = sampled.iter()
                        .map(|f| [f.time, f.altitude_angle.to_degrees()])
                        .collect();
                    let throttle: PlotPoints = sampled.iter()
                        .map(|f| [f.time, f.throttle * 100.0])
                        .collect();
                    Plot::new("guidance")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude angle (deg)", angle));
                            plot_ui.line(Line::new("Throttle (%)", throttle));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Trajectory (km)");
                    let path: PlotPoints = sampled.iter()
                        .map(|f| [f.position.x / 1000.0, f.position.y / 1000.0])
                        .collect();
                    let surface: PlotPoints = (0..=360)
                        .map(|deg| {
                            let a = f64::from(deg).to_radians();
                            let r = self.planet_radius / 1000.0;
                            [r * a.cos(), r * a.sin()]
                        })
                        .collect();
                    Plot::new("trajectory")
                        .width(half_w)
                        .height(half_h)
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Surface", surface));
                            plot_ui.line(Line::new("Ascent", path));
                        });
                });
            });
        });
    }
}
