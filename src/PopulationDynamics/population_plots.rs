use super::population_IVP::Trajectory;
use RustedSciThe::Utils::plots::{plots, plots_terminal};
use log::info;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// where the population charts go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotBackend {
    /// PNG files
    Png,
    Terminal,
    Disabled,
}

impl Default for PlotBackend {
    fn default() -> Self {
        PlotBackend::Png
    }
}

/// data of one chart: abscissa, named ordinates (one column each) and a title for the log.
/// RustedSciThe writes one `{name}.png` per ordinate and uses the name as caption,
/// so names carry the method and the kind of chart.
pub struct ChartData {
    pub title: String,
    pub arg: String,
    pub values: Vec<String>,
    pub x: DVector<f64>,
    pub y: DMatrix<f64>,
}

/// prey and predator populations vs time
pub fn time_series_chart(trajectory: &Trajectory) -> ChartData {
    ChartData {
        title: format!("Lotka-Volterra model using {}", trajectory.method),
        arg: "time".to_owned(),
        values: vec![
            format!("prey_{}", trajectory.method),
            format!("predator_{}", trajectory.method),
        ],
        x: trajectory.t.clone(),
        y: trajectory.y.clone(),
    }
}

/// predator population as a function of prey population
pub fn phase_chart(trajectory: &Trajectory) -> ChartData {
    let predator = trajectory.predator();
    ChartData {
        title: format!("phase plot using {}", trajectory.method),
        arg: "prey".to_owned(),
        values: vec![format!("phase_predator_vs_prey_{}", trajectory.method)],
        x: trajectory.prey(),
        y: DMatrix::from_iterator(predator.len(), 1, predator.iter().cloned()),
    }
}

pub fn draw(chart: ChartData, backend: PlotBackend) {
    if backend == PlotBackend::Disabled {
        return;
    }
    info!("plotting: {}", chart.title);
    match backend {
        PlotBackend::Png => {
            plots(chart.arg, chart.values, chart.x, chart.y);
        }
        PlotBackend::Terminal => {
            plots_terminal(chart.arg, chart.values, chart.x, chart.y);
        }
        PlotBackend::Disabled => {}
    }
}

/// Time-series charts of every trajectory first, then their phase plots.
pub fn charts(trajectories: &[Trajectory]) -> Vec<ChartData> {
    let time_series = trajectories.iter().map(time_series_chart);
    let phase = trajectories.iter().map(phase_chart);
    time_series.chain(phase).collect()
}

pub fn plot_trajectories(trajectories: &[Trajectory], backend: PlotBackend) {
    for chart in charts(trajectories) {
        draw(chart, backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PopulationDynamics::population_IVP::IntegrationMethod;
    use std::collections::HashSet;

    fn sample() -> Trajectory {
        sample_with(IntegrationMethod::RK45)
    }

    fn sample_with(method: IntegrationMethod) -> Trajectory {
        Trajectory {
            method,
            t: DVector::from_vec(vec![0.0, 1.0, 2.0]),
            y: DMatrix::from_row_slice(3, 2, &[10.0, 10.0, 12.0, 6.0, 11.0, 3.0]),
        }
    }

    #[test]
    fn time_series_keeps_both_populations() {
        let chart = time_series_chart(&sample());
        assert_eq!(chart.values, vec!["prey_RK45", "predator_RK45"]);
        assert_eq!(chart.y.shape(), (3, 2));
        assert_eq!(chart.title, "Lotka-Volterra model using RK45");
    }

    #[test]
    fn phase_chart_plots_predator_against_prey() {
        let chart = phase_chart(&sample());
        assert_eq!(chart.x.as_slice(), &[10.0, 12.0, 11.0]);
        assert_eq!(chart.y.as_slice(), &[10.0, 6.0, 3.0]);
        assert_eq!(chart.arg, "prey");
        assert_eq!(chart.values, vec!["phase_predator_vs_prey_RK45"]);
    }

    #[test]
    fn every_series_gets_its_own_file_name() {
        let trajectories = [
            sample_with(IntegrationMethod::RK45),
            sample_with(IntegrationMethod::BDF),
        ];
        let charts = charts(&trajectories);
        assert_eq!(charts.len(), 4);
        let names: Vec<&String> = charts.iter().flat_map(|c| c.values.iter()).collect();
        assert_eq!(names.len(), 6);
        let distinct: HashSet<&String> = names.iter().cloned().collect();
        assert_eq!(distinct.len(), names.len(), "repeated series names: {:?}", names);
    }

    #[test]
    fn disabled_backend_draws_nothing() {
        plot_trajectories(&[sample()], PlotBackend::Disabled);
    }
}
