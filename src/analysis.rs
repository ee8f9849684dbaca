use serde::Serialize;

use crate::chart::{
    Bar, BarChartSpec, ChartSpec, DualAxisSpec, LineChartSpec, Palette, ProportionSpec, Series,
    Slice,
};
use crate::dataset::{Dataset, Record, Season};
use crate::table::{self, Mean};

/// Weight of one wicket in the derived all-rounder score.
pub const WICKET_WEIGHT: u64 = 20;
pub const DEFAULT_LEADERBOARD_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    PlayerStats,
    MatchStats,
    BestBowler,
    BestAllRounder,
    TeamPerformance,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::PlayerStats,
        Mode::MatchStats,
        Mode::BestBowler,
        Mode::BestAllRounder,
        Mode::TeamPerformance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::PlayerStats => "Player Stats",
            Mode::MatchStats => "Match Stats",
            Mode::BestBowler => "Best Bowler",
            Mode::BestAllRounder => "Best All-Rounder",
            Mode::TeamPerformance => "Team Performance",
        }
    }

    pub fn picker(self) -> Option<PickerKind> {
        match self {
            Mode::PlayerStats => Some(PickerKind::Player),
            Mode::MatchStats => Some(PickerKind::Match),
            Mode::TeamPerformance => Some(PickerKind::Team),
            Mode::BestBowler | Mode::BestAllRounder => None,
        }
    }

    pub fn index(self) -> usize {
        Mode::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerKind {
    Player,
    Match,
    Team,
}

impl PickerKind {
    pub fn label(self) -> &'static str {
        match self {
            PickerKind::Player => "Select Player",
            PickerKind::Match => "Select Match ID",
            PickerKind::Team => "Select Team",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    PlayerStats { player: String },
    MatchStats { match_id: String },
    BestBowler,
    BestAllRounder,
    TeamPerformance { team: String },
}

impl Selection {
    pub fn mode(&self) -> Mode {
        match self {
            Selection::PlayerStats { .. } => Mode::PlayerStats,
            Selection::MatchStats { .. } => Mode::MatchStats,
            Selection::BestBowler => Mode::BestBowler,
            Selection::BestAllRounder => Mode::BestAllRounder,
            Selection::TeamPerformance { .. } => Mode::TeamPerformance,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything the front end draws for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub subheader: String,
    pub summary: String,
    pub table: Option<TableView>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub leaderboard_rows: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            leaderboard_rows: DEFAULT_LEADERBOARD_ROWS,
        }
    }
}

pub fn render(dataset: &Dataset, selection: &Selection, opts: &RenderOptions) -> View {
    match selection {
        Selection::PlayerStats { player } => {
            let stats = player_stats(dataset, player);
            View {
                subheader: "Player-Wise Statistics".to_string(),
                summary: format!("Statistics for {player}:"),
                table: Some(stats.table()),
                charts: stats.charts(),
            }
        }
        Selection::MatchStats { match_id } => {
            let stats = match_stats(dataset, match_id);
            View {
                subheader: "Match-Wise Team Statistics".to_string(),
                summary: format!("Statistics for Match ID {match_id}:"),
                table: Some(stats.table()),
                charts: vec![stats.chart()],
            }
        }
        Selection::BestBowler => render_best_bowler(dataset, opts),
        Selection::BestAllRounder => render_best_allrounder(dataset, opts),
        Selection::TeamPerformance { team } => {
            let perf = team_performance(dataset, team);
            View {
                subheader: "Team Performance Analysis".to_string(),
                summary: format!("Performance of {team} over the seasons:"),
                table: Some(perf.table()),
                charts: vec![perf.chart()],
            }
        }
    }
}

fn render_best_bowler(dataset: &Dataset, opts: &RenderOptions) -> View {
    let subheader = "Best Bowler of IPL".to_string();
    let leaderboard = bowler_leaderboard(dataset);
    let Some(best) = leaderboard.first() else {
        return empty_view(subheader);
    };

    let rows = player_rows(dataset, &best.player);
    let chart = per_row_bars(
        format!("Wickets across Seasons for {}", best.player),
        "Wickets",
        Palette::Neutral,
        &rows,
        |r| r.wickets as f64,
    );

    let mut table = TableView::new(&["Player", "Wickets", "Avg Economy"]);
    for entry in leaderboard.iter().take(opts.leaderboard_rows) {
        table.rows.push(vec![
            entry.player.clone(),
            entry.wickets.to_string(),
            format_rate(entry.economy_mean),
        ]);
    }

    View {
        subheader,
        summary: format!(
            "The best bowler in IPL is {} with {} wickets.",
            best.player, best.wickets
        ),
        table: Some(table),
        charts: vec![chart],
    }
}

fn render_best_allrounder(dataset: &Dataset, opts: &RenderOptions) -> View {
    let subheader = "Best All-Rounder of IPL".to_string();
    let leaderboard = allrounder_leaderboard(dataset);
    let Some(best) = leaderboard.first() else {
        return empty_view(subheader);
    };

    let rows = player_rows(dataset, &best.player);
    let chart = ChartSpec::Line(LineChartSpec {
        title: format!("All-Rounder Performance for {}", best.player),
        x_label: "Season".to_string(),
        x_labels: rows.iter().map(|r| r.season.to_string()).collect(),
        series: vec![
            Series {
                name: "Runs".to_string(),
                values: rows.iter().map(|r| r.runs as f64).collect(),
            },
            Series {
                name: "Wickets".to_string(),
                values: rows.iter().map(|r| r.wickets as f64).collect(),
            },
        ],
    });

    let mut table = TableView::new(&["Player", "Runs", "Wickets", "AllRounderScore"]);
    for entry in leaderboard.iter().take(opts.leaderboard_rows) {
        table.rows.push(vec![
            entry.player.clone(),
            entry.runs.to_string(),
            entry.wickets.to_string(),
            entry.score.to_string(),
        ]);
    }

    View {
        subheader,
        summary: format!(
            "The best all-rounder in IPL is {} with {} AllRounder Score.",
            best.player, best.score
        ),
        table: Some(table),
        charts: vec![chart],
    }
}

fn empty_view(subheader: String) -> View {
    View {
        subheader,
        summary: "No records loaded.".to_string(),
        table: None,
        charts: Vec::new(),
    }
}

fn player_rows<'a>(dataset: &'a Dataset, player: &str) -> Vec<&'a Record> {
    table::filter(dataset.records(), |r| r.player == player)
}

/// One bar per row, labelled by the row's season. Repeated seasons are not merged.
fn per_row_bars(
    title: String,
    y_label: &str,
    palette: Palette,
    rows: &[&Record],
    value: impl Fn(&Record) -> f64,
) -> ChartSpec {
    ChartSpec::Bar(BarChartSpec {
        title,
        x_label: "Season".to_string(),
        y_label: y_label.to_string(),
        palette,
        bars: rows
            .iter()
            .map(|r| Bar {
                label: r.season.to_string(),
                value: value(*r),
            })
            .collect(),
    })
}

#[derive(Debug, Clone)]
pub struct PlayerStats<'a> {
    pub player: String,
    pub rows: Vec<&'a Record>,
}

pub fn player_stats<'a>(dataset: &'a Dataset, player: &str) -> PlayerStats<'a> {
    PlayerStats {
        player: player.to_string(),
        rows: player_rows(dataset, player),
    }
}

impl PlayerStats<'_> {
    pub fn table(&self) -> TableView {
        let mut table = TableView::new(&[
            "Season",
            "Team",
            "MatchID",
            "Runs",
            "Wickets",
            "Strike Rate",
            "Economy Rate",
            "Overs Bowled",
            "AllRounder Score",
        ]);
        for r in &self.rows {
            table.rows.push(vec![
                r.season.to_string(),
                r.team.clone(),
                r.match_id.clone(),
                r.runs.to_string(),
                r.wickets.to_string(),
                format_rate(r.strike_rate),
                format_rate(r.economy_rate),
                format_rate(r.overs_bowled),
                format_rate(r.allrounder_score),
            ]);
        }
        table
    }

    pub fn charts(&self) -> Vec<ChartSpec> {
        vec![
            per_row_bars(
                format!("Runs per Season for {}", self.player),
                "Runs",
                Palette::Blue,
                &self.rows,
                |r| r.runs as f64,
            ),
            per_row_bars(
                format!("Wickets per Season for {}", self.player),
                "Wickets",
                Palette::Green,
                &self.rows,
                |r| r.wickets as f64,
            ),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct MatchStats<'a> {
    pub match_id: String,
    pub rows: Vec<&'a Record>,
}

pub fn match_stats<'a>(dataset: &'a Dataset, match_id: &str) -> MatchStats<'a> {
    MatchStats {
        match_id: match_id.to_string(),
        rows: table::filter(dataset.records(), |r| r.match_id == match_id),
    }
}

impl MatchStats<'_> {
    pub fn total_runs(&self) -> u64 {
        self.rows.iter().map(|r| r.runs as u64).sum()
    }

    pub fn table(&self) -> TableView {
        let mut table = TableView::new(&[
            "Team",
            "Player",
            "Runs",
            "Wickets",
            "Strike Rate",
            "Economy Rate",
            "Overs Bowled",
        ]);
        for r in &self.rows {
            table.rows.push(vec![
                r.team.clone(),
                r.player.clone(),
                r.runs.to_string(),
                r.wickets.to_string(),
                format_rate(r.strike_rate),
                format_rate(r.economy_rate),
                format_rate(r.overs_bowled),
            ]);
        }
        table
    }

    /// One slice per row, labelled by team. Rows of the same team are not summed.
    pub fn chart(&self) -> ChartSpec {
        ChartSpec::Proportion(ProportionSpec {
            title: format!("Runs Distribution in Match {}", self.match_id),
            slices: self
                .rows
                .iter()
                .map(|r| Slice {
                    label: r.team.clone(),
                    value: r.runs as f64,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerTotals {
    pub player: String,
    pub wickets: u64,
    pub economy_mean: f64,
}

#[derive(Default)]
struct BowlerAcc {
    wickets: u64,
    economy: Mean,
}

/// All players by total wickets, highest first. Ties keep ascending name order.
pub fn bowler_leaderboard(dataset: &Dataset) -> Vec<BowlerTotals> {
    let groups = table::group_by(
        dataset.records(),
        |r: &Record| r.player.clone(),
        BowlerAcc::default,
        |acc: &mut BowlerAcc, r: &Record| {
            acc.wickets += r.wickets as u64;
            acc.economy.push(r.economy_rate);
        },
    );
    let mut board: Vec<BowlerTotals> = groups
        .into_iter()
        .map(|(player, acc)| BowlerTotals {
            player,
            wickets: acc.wickets,
            economy_mean: acc.economy.value(),
        })
        .collect();
    table::sort_desc_by(&mut board, |b| b.wickets);
    board
}

pub fn best_bowler(dataset: &Dataset) -> Option<BowlerTotals> {
    bowler_leaderboard(dataset).into_iter().next()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllRounderTotals {
    pub player: String,
    pub runs: u64,
    pub wickets: u64,
    pub score: u64,
}

pub fn allrounder_score(runs: u64, wickets: u64) -> u64 {
    runs + wickets * WICKET_WEIGHT
}

/// All players by derived all-rounder score, highest first. Ties keep ascending name order.
pub fn allrounder_leaderboard(dataset: &Dataset) -> Vec<AllRounderTotals> {
    let groups = table::group_by(
        dataset.records(),
        |r: &Record| r.player.clone(),
        || (0u64, 0u64),
        |acc: &mut (u64, u64), r: &Record| {
            acc.0 += r.runs as u64;
            acc.1 += r.wickets as u64;
        },
    );
    let mut board: Vec<AllRounderTotals> = groups
        .into_iter()
        .map(|(player, (runs, wickets))| AllRounderTotals {
            player,
            runs,
            wickets,
            score: allrounder_score(runs, wickets),
        })
        .collect();
    table::sort_desc_by(&mut board, |b| b.score);
    board
}

pub fn best_allrounder(dataset: &Dataset) -> Option<AllRounderTotals> {
    allrounder_leaderboard(dataset).into_iter().next()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonTotals {
    pub season: Season,
    pub runs: u64,
    pub wickets: u64,
}

#[derive(Debug, Clone)]
pub struct TeamPerformance<'a> {
    pub team: String,
    pub rows: Vec<&'a Record>,
    /// Ascending by season.
    pub seasons: Vec<SeasonTotals>,
}

pub fn team_performance<'a>(dataset: &'a Dataset, team: &str) -> TeamPerformance<'a> {
    let rows = table::filter(dataset.records(), |r| r.team == team);
    let seasons = table::group_by(
        rows.iter().copied(),
        |r: &Record| r.season.clone(),
        || (0u64, 0u64),
        |acc: &mut (u64, u64), r: &Record| {
            acc.0 += r.runs as u64;
            acc.1 += r.wickets as u64;
        },
    )
    .into_iter()
    .map(|(season, (runs, wickets))| SeasonTotals {
        season,
        runs,
        wickets,
    })
    .collect();

    TeamPerformance {
        team: team.to_string(),
        rows,
        seasons,
    }
}

impl TeamPerformance<'_> {
    pub fn table(&self) -> TableView {
        let mut table = TableView::new(&[
            "Season",
            "Player",
            "Runs",
            "Wickets",
            "Strike Rate",
            "Economy Rate",
        ]);
        for r in &self.rows {
            table.rows.push(vec![
                r.season.to_string(),
                r.player.clone(),
                r.runs.to_string(),
                r.wickets.to_string(),
                format_rate(r.strike_rate),
                format_rate(r.economy_rate),
            ]);
        }
        table
    }

    pub fn chart(&self) -> ChartSpec {
        ChartSpec::DualAxis(DualAxisSpec {
            title: format!(
                "Performance of {} (Runs & Wickets) across Seasons",
                self.team
            ),
            x_label: "Season".to_string(),
            x_labels: self.seasons.iter().map(|s| s.season.to_string()).collect(),
            primary_label: "Total Runs".to_string(),
            secondary_label: "Total Wickets".to_string(),
            bars: Series {
                name: "Runs".to_string(),
                values: self.seasons.iter().map(|s| s.runs as f64).collect(),
            },
            line: Series {
                name: "Wickets".to_string(),
                values: self.seasons.iter().map(|s| s.wickets as f64).collect(),
            },
        })
    }
}

pub fn format_rate(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    format!("{value:.2}")
}
