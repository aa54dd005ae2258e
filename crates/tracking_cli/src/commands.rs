use crate::cli::{Command, Layout, SchemeArg};
use crate::config::load_sweep_settings;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracking_core::batch::run_sweep_cancellable;
use tracking_core::export::{write_batch, write_columns, write_rows, write_series};
use tracking_core::tracking::{track_pendulum_cancellable, track_standard_map_cancellable};
use tracking_core::{
    iteration_count, CancelToken, Drive, PendulumParams, PendulumScheme, PhaseState, StandardMap,
    SweepSettings, Trajectory,
};

impl From<SchemeArg> for PendulumScheme {
    fn from(scheme: SchemeArg) -> Self {
        match scheme {
            SchemeArg::Yoshida4 => PendulumScheme::Yoshida4,
            SchemeArg::SymplecticEuler => PendulumScheme::SymplecticEuler,
        }
    }
}

pub fn run(cmd: Command, cancel: &CancelToken) -> Result<()> {
    match cmd {
        Command::StandardMap {
            theta0,
            p0,
            k,
            steps,
            layout,
            out,
        } => {
            let steps = iteration_count(steps)?;
            let trajectory = track_standard_map_cancellable(
                PhaseState::new(theta0, p0),
                &StandardMap::new(k),
                steps,
                cancel,
            )
            .context("Standard map tracking")?;
            write_trajectory(&out, layout, &trajectory)
        }
        Command::Pendulum {
            theta0,
            p0,
            omega,
            dt,
            steps,
            scheme,
            drive_amplitude,
            drive_frequency,
            drive_phase,
            layout,
            out,
        } => {
            let steps = iteration_count(steps)?;
            let drive = match (drive_amplitude, drive_frequency) {
                (Some(amplitude), Some(frequency)) => Some(Drive {
                    amplitude,
                    frequency,
                    phase: drive_phase,
                }),
                _ => None,
            };
            let params = PendulumParams {
                omega,
                dt,
                drive,
                scheme: scheme.into(),
            };
            let trajectory =
                track_pendulum_cancellable(PhaseState::new(theta0, p0), &params, steps, cancel)
                    .context("Pendulum tracking")?;
            write_trajectory(&out, layout, &trajectory)
        }
        Command::Sweep {
            config,
            conditions,
            max_amplitude,
            p0,
            k,
            steps,
            parallel,
            no_parallel,
            out,
        } => {
            let mut settings = match &config {
                Some(path) => load_sweep_settings(path)?,
                None => SweepSettings::default(),
            };
            if let Some(conditions) = conditions {
                settings.conditions = conditions;
            }
            if let Some(max_amplitude) = max_amplitude {
                settings.max_amplitude = max_amplitude;
            }
            if let Some(p0) = p0 {
                settings.p0 = p0;
            }
            if let Some(k) = k {
                settings.k = k;
            }
            if let Some(steps) = steps {
                settings.steps = iteration_count(steps)?;
            }
            if let Some(parallel) = parallel_override(parallel, no_parallel) {
                settings.parallel = parallel;
            }

            let batch = run_sweep_cancellable(&settings, cancel).context("Standard map sweep")?;
            write_file(&out, |w| write_batch(w, &batch))?;
            eprintln!(
                "wrote {} trajectories of {} samples to {}",
                batch.conditions(),
                batch.samples(),
                out.display()
            );
            Ok(())
        }
    }
}

/// `--parallel` / `--no-parallel`; `None` keeps the configured value.
fn parallel_override(parallel: bool, no_parallel: bool) -> Option<bool> {
    match (parallel, no_parallel) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("Write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Flush {}", path.display()))
}

/// `dir/name.csv` -> `dir/name_<suffix>.csv`.
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    path.with_file_name(format!("{stem}_{suffix}.{extension}"))
}

fn write_trajectory(path: &Path, layout: Layout, trajectory: &Trajectory) -> Result<()> {
    match layout {
        Layout::Columns => write_file(path, |w| write_columns(w, trajectory))?,
        Layout::Rows => write_file(path, |w| write_rows(w, trajectory))?,
        Layout::Split => {
            write_file(&suffixed(path, "theta"), |w| write_series(w, trajectory.theta()))?;
            write_file(&suffixed(path, "p"), |w| write_series(w, trajectory.p()))?;
        }
    }
    eprintln!("wrote {} samples to {}", trajectory.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parallel_override, run, suffixed};
    use crate::cli::{Command, Layout, SchemeArg};
    use std::io::Write;
    use std::path::Path;
    use tracking_core::CancelToken;

    fn read_rows(path: &Path) -> Vec<Vec<f64>> {
        std::fs::read_to_string(path)
            .expect("read output")
            .lines()
            .map(|line| line.split(',').map(|v| v.parse().expect("float")).collect())
            .collect()
    }

    #[test]
    fn suffixed_keeps_directory_and_extension() {
        assert_eq!(
            suffixed(Path::new("out/standard_tracking.csv"), "theta"),
            Path::new("out/standard_tracking_theta.csv")
        );
        assert_eq!(suffixed(Path::new("run"), "p"), Path::new("run_p.csv"));
    }

    #[test]
    fn standard_map_writes_one_row_per_sample() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("standard.csv");
        run(
            Command::StandardMap {
                theta0: 0.1,
                p0: 0.0,
                k: -1.0,
                steps: 100,
                layout: Layout::Columns,
                out: out.clone(),
            },
            &CancelToken::new(),
        )
        .expect("run");
        let rows = read_rows(&out);
        assert_eq!(rows.len(), 101);
        assert_eq!(rows[0], vec![0.1, 0.0]);
    }

    #[test]
    fn split_layout_writes_two_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("standard_tracking.csv");
        run(
            Command::StandardMap {
                theta0: 0.15,
                p0: 0.0,
                k: -1.0,
                steps: 10,
                layout: Layout::Split,
                out,
            },
            &CancelToken::new(),
        )
        .expect("run");
        assert_eq!(read_rows(&dir.path().join("standard_tracking_theta.csv")).len(), 11);
        assert_eq!(read_rows(&dir.path().join("standard_tracking_p.csv")).len(), 11);
    }

    #[test]
    fn pendulum_rows_layout_has_two_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("pendulum.csv");
        run(
            Command::Pendulum {
                theta0: std::f64::consts::FRAC_PI_4,
                p0: 0.0,
                omega: std::f64::consts::PI,
                dt: 0.01,
                steps: 1000,
                scheme: SchemeArg::Yoshida4,
                drive_amplitude: None,
                drive_frequency: None,
                drive_phase: 0.0,
                layout: Layout::Rows,
                out: out.clone(),
            },
            &CancelToken::new(),
        )
        .expect("run");
        let rows = read_rows(&out);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 1001);
        assert_eq!(rows[1][0], 0.0);
    }

    #[test]
    fn pendulum_rejects_zero_time_step() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("pendulum.csv");
        let err = run(
            Command::Pendulum {
                theta0: 0.1,
                p0: 0.0,
                omega: 1.0,
                dt: 0.0,
                steps: 10,
                scheme: SchemeArg::SymplecticEuler,
                drive_amplitude: None,
                drive_frequency: None,
                drive_phase: 0.0,
                layout: Layout::Columns,
                out: out.clone(),
            },
            &CancelToken::new(),
        )
        .expect_err("expected error");
        assert!(format!("{err:#}").contains("dt must be positive"));
        assert!(!out.exists());
    }

    #[test]
    fn negative_steps_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = run(
            Command::StandardMap {
                theta0: 0.1,
                p0: 0.0,
                k: -1.0,
                steps: -1,
                layout: Layout::Columns,
                out: dir.path().join("never.csv"),
            },
            &CancelToken::new(),
        )
        .expect_err("expected error");
        assert!(format!("{err:#}").contains("non-negative"));
    }

    #[test]
    fn sweep_flags_override_config_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = dir.path().join("sweep.toml");
        let mut file = std::fs::File::create(&config).expect("create config");
        writeln!(file, "[sweep]\nconditions = 4\nsteps = 30\nk = -0.8").expect("write config");
        let out = dir.path().join("standard_map_data.csv");

        run(
            Command::Sweep {
                config: Some(config),
                conditions: None,
                max_amplitude: None,
                p0: None,
                k: None,
                steps: Some(20),
                parallel: true,
                no_parallel: false,
                out: out.clone(),
            },
            &CancelToken::new(),
        )
        .expect("run");

        let rows = read_rows(&out);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.len() == 21 * 2));
        assert_eq!(rows[0][0], 0.0);
        assert_eq!(rows[3][0], std::f64::consts::FRAC_PI_3);
    }

    #[test]
    fn sweep_flags_can_switch_off_parallel_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = dir.path().join("sweep.toml");
        std::fs::write(&config, "[sweep]\nconditions = 2\nsteps = 5\nparallel = true\n")
            .expect("write config");
        let out = dir.path().join("sequential.csv");
        assert_eq!(parallel_override(false, true), Some(false));
        assert_eq!(parallel_override(true, false), Some(true));
        assert_eq!(parallel_override(false, false), None);

        run(
            Command::Sweep {
                config: Some(config),
                conditions: None,
                max_amplitude: None,
                p0: None,
                k: None,
                steps: None,
                parallel: false,
                no_parallel: true,
                out: out.clone(),
            },
            &CancelToken::new(),
        )
        .expect("run");
        assert_eq!(read_rows(&out).len(), 2);
    }

    #[test]
    fn cancelled_sweep_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("cancelled.csv");
        let token = CancelToken::new();
        token.cancel();
        let err = run(
            Command::Sweep {
                config: None,
                conditions: Some(2),
                max_amplitude: None,
                p0: None,
                k: None,
                steps: Some(10),
                parallel: false,
                no_parallel: false,
                out: out.clone(),
            },
            &token,
        )
        .expect_err("expected error");
        assert!(format!("{err:#}").contains("cancelled"));
        assert!(!out.exists());
    }
}
