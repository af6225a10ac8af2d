//! A module for the main application logic for the blade fatigue assessment tool
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{load_config, Config, LoadCase};
use crate::damage::{score_segments, CumulativeDamage};
use crate::parser::to_stress;
use crate::timeseries::{read_signal, split_segments};

/// Damage summary of one load case.
#[derive(Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub samples: usize,
    pub full_cycles: usize,
    pub half_cycles: usize,
    /// Damage of each segment, in record order.
    pub segment_damage: Vec<f64>,
    /// Running total after each segment.
    pub cumulative_damage: Vec<f64>,
    /// Damage of one full record.
    pub damage_per_unit: f64,
    /// `None` when the record does no damage.
    pub life_years: Option<f64>,
}

/// Scores every load case of a validated configuration.
pub fn assess(config: &Config) -> Result<Vec<Report>> {
    config
        .loadcases
        .iter()
        .map(|lc| assess_loadcase(config, lc))
        .collect()
}

fn assess_loadcase(config: &Config, lc: &LoadCase) -> Result<Report> {
    let path = config.loadcase_path(lc);
    let raw = read_signal(&path, lc.column, lc.header, lc.delimiter_byte()?)?;
    let stress = to_stress(raw, lc.transfer.as_deref(), &lc.parameters)
        .with_context(|| format!("loadcase {}", lc.name))?;

    let segments = split_segments(&stress, config.analysis.segments);
    let scores = score_segments(&segments, &config.material.sn_curve)
        .with_context(|| format!("loadcase {}", lc.name))?;

    // Accumulate in record order so the trace is reproducible
    let cumulative: CumulativeDamage = scores.iter().map(|s| s.damage).collect();
    let life_years = cumulative.life_in_years(config.analysis.units_per_year);

    if life_years.is_finite() {
        info!(
            loadcase = %lc.name,
            damage = cumulative.total(),
            life_years,
            "loadcase assessed"
        );
    } else {
        warn!(loadcase = %lc.name, "loadcase does no damage, life is unbounded");
    }

    Ok(Report {
        name: lc.name.clone(),
        samples: stress.len(),
        full_cycles: scores.iter().map(|s| s.full_cycles).sum(),
        half_cycles: scores.iter().map(|s| s.half_cycles).sum(),
        segment_damage: scores.iter().map(|s| s.damage).collect(),
        cumulative_damage: cumulative.trace().to_vec(),
        damage_per_unit: cumulative.total(),
        life_years: life_years.is_finite().then_some(life_years),
    })
}

pub fn run(config_path: &str, output: Option<&Path>) -> Result<()> {
    info!(config = config_path, "running fatigue assessment");
    let conf = load_config(config_path)?;
    conf.validate()
        .with_context(|| format!("invalid configuration {}", config_path))?;
    let curve = &conf.material.sn_curve;
    info!(
        material = %conf.material.name,
        m = curve.slope(),
        s_ref = curve.reference_stress(),
        n_ref = curve.reference_cycles(),
        "S-N curve loaded"
    );

    let reports = assess(&conf)?;
    let json = serde_json::to_string_pretty(&reports)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_assess_config() {
        let config = load_config("tests/config.yaml").expect("Failed to load config");
        let reports = assess(&config).expect("Failed to assess");
        assert_eq!(reports.len(), 3);

        for report in &reports {
            assert_eq!(report.segment_damage.len(), config.analysis.segments);
            assert_eq!(report.cumulative_damage.len(), config.analysis.segments);
            assert!(report.cumulative_damage.windows(2).all(|w| w[0] <= w[1]));
            assert_relative_eq!(
                *report.cumulative_damage.last().unwrap(),
                report.damage_per_unit,
                max_relative = 1e-12
            );
            assert!(report.life_years.is_some());
        }

        // Stronger, more variable wind wears the blade faster
        let life: Vec<f64> = reports.iter().map(|r| r.life_years.unwrap()).collect();
        assert!(life[0] > life[1] && life[1] > life[2], "{:?}", life);
    }

    #[test]
    fn test_flat_record_has_no_life_limit() {
        let mut config = load_config("tests/config.yaml").expect("Failed to load config");
        config.loadcases.truncate(1);
        config.loadcases[0].transfer = Some("k * 0 * x".into());
        let reports = assess(&config).expect("Failed to assess");
        assert_eq!(reports[0].damage_per_unit, 0.0);
        assert_eq!(reports[0].life_years, None);
        let json = serde_json::to_value(&reports[0]).unwrap();
        assert!(json["life_years"].is_null());
    }

    #[test]
    fn test_run_writes_report() {
        let out = std::env::temp_dir().join(format!("blade-fatigue-report-{}.json", std::process::id()));
        run("tests/config.toml", Some(out.as_path())).expect("Failed to run");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written[0]["name"], "Measured");
        let _ = fs::remove_file(out);
    }
}
