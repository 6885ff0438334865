//! Plot sinks: text charts on the terminal, or nothing at all

use std::io::{self, Write};

use console::style;

use crate::pipeline::correlation::CorrelationMatrix;
use crate::pipeline::crosstab::CrossTab;
use crate::pipeline::missing::MissingMatrix;
use crate::pipeline::univariate::{BoxPlotStats, CategoricalUnivariate, Histogram};

/// A chart produced by a pipeline step.
#[derive(Debug, Clone, Copy)]
pub enum Plot<'a> {
    /// Histogram with KDE overlay
    Distribution(&'a Histogram),
    /// Side-by-side boxplots sharing one axis
    BoxPlots {
        title: &'a str,
        boxes: &'a [BoxPlotStats],
    },
    /// Bar per category
    Counts(&'a CategoricalUnivariate),
    /// Correlation heatmap
    Heatmap(&'a CorrelationMatrix),
    /// Row-normalized stacked bars
    StackedBars {
        title: &'a str,
        table: &'a CrossTab,
    },
    /// Presence/absence matrix
    Missingness(&'a MissingMatrix),
}

impl Plot<'_> {
    pub fn title(&self) -> String {
        match self {
            Plot::Distribution(h) => format!("Distribution of {}", h.column),
            Plot::BoxPlots { title, .. } | Plot::StackedBars { title, .. } => title.to_string(),
            Plot::Counts(c) => format!("Count plot of {}", c.column),
            Plot::Heatmap(_) => "Correlation heatmap".to_string(),
            Plot::Missingness(_) => "Missing value matrix".to_string(),
        }
    }
}

/// Receives every chart of a run. Sinks never touch the data.
pub trait PlotSink {
    fn render(&mut self, plot: Plot<'_>) -> io::Result<()>;
}

/// Discards every plot (`--no-plots`, JSON output, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlotter;

impl PlotSink for NullPlotter {
    fn render(&mut self, _plot: Plot<'_>) -> io::Result<()> {
        Ok(())
    }
}

const BAR_WIDTH: usize = 40;
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Renders plots as text charts.
pub struct TerminalPlotter<W: Write> {
    out: W,
    width: usize,
}

impl TerminalPlotter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalPlotter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: BAR_WIDTH,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 {
            return String::new();
        }
        let len = ((value / max) * self.width as f64).round() as usize;
        "█".repeat(len.min(self.width))
    }

    fn distribution(&mut self, hist: &Histogram) -> io::Result<()> {
        let n: usize = hist.counts.iter().sum();
        let width = hist.bin_width();
        let max = hist.counts.iter().copied().max().unwrap_or(0) as f64;
        for (i, count) in hist.counts.iter().enumerate() {
            let expected = hist.density[i] * n as f64 * width;
            writeln!(
                self.out,
                "      {:>12.2} │{:<w$}│ {:>5}  kde {:>7.1}",
                hist.edges[i],
                self.bar(*count as f64, max),
                count,
                expected,
                w = self.width
            )?;
        }
        writeln!(self.out, "      bandwidth (Scott): {:.4}", hist.bandwidth)
    }

    fn boxplots(&mut self, boxes: &[BoxPlotStats]) -> io::Result<()> {
        let lo = boxes.iter().map(|b| b.lower_whisker).fold(f64::INFINITY, f64::min);
        let hi = boxes.iter().map(|b| b.upper_whisker).fold(f64::NEG_INFINITY, f64::max);
        let span = if hi > lo { hi - lo } else { 1.0 };
        let last = self.width - 1;
        let pos = |v: f64| (((v - lo) / span) * last as f64).round().clamp(0.0, last as f64) as usize;

        let label_width = boxes.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        for b in boxes {
            let mut line = vec![' '; self.width];
            let (w0, q1, med, q3, w1) = (
                pos(b.lower_whisker),
                pos(b.q1),
                pos(b.median),
                pos(b.q3),
                pos(b.upper_whisker),
            );
            for cell in line.iter_mut().take(w1 + 1).skip(w0) {
                *cell = '─';
            }
            for cell in line.iter_mut().take(q3 + 1).skip(q1) {
                *cell = '▒';
            }
            line[w0] = '├';
            line[w1] = '┤';
            line[med] = '┃';
            let line: String = line.into_iter().collect();
            writeln!(
                self.out,
                "      {:>lw$} {} n={} outliers={}",
                b.label,
                line,
                b.count,
                b.outliers,
                lw = label_width
            )?;
        }
        writeln!(self.out, "      axis: {:.2} .. {:.2}", lo, hi)
    }

    fn counts(&mut self, counts: &CategoricalUnivariate) -> io::Result<()> {
        let max = counts.counts.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;
        let label_width = counts.counts.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        for ((label, count), pct) in counts.counts.iter().zip(&counts.percentages) {
            writeln!(
                self.out,
                "      {:>lw$} │{:<w$}│ {:>5} ({:.1}%)",
                label,
                self.bar(*count as f64, max),
                count,
                pct,
                lw = label_width,
                w = self.width
            )?;
        }
        Ok(())
    }

    fn heatmap(&mut self, matrix: &CorrelationMatrix) -> io::Result<()> {
        let label_width = matrix.columns.iter().map(|c| c.len()).max().unwrap_or(0);
        for a in &matrix.columns {
            let mut row = String::new();
            for b in &matrix.columns {
                let r = matrix.get(a, b).unwrap_or(f64::NAN);
                let cell = if r.is_nan() {
                    "   ·   ".to_string()
                } else {
                    let shade = SHADES[((r.abs() * 4.0).round() as usize).min(4)];
                    format!("{}{:+.2}{}", shade, r, shade)
                };
                row.push_str(&cell);
                row.push(' ');
            }
            writeln!(self.out, "      {:>lw$} {}", a, row, lw = label_width)?;
        }
        Ok(())
    }

    fn stacked(&mut self, table: &CrossTab) -> io::Result<()> {
        const FILLS: [char; 4] = ['█', '▒', '░', '▓'];
        let percentages = table.row_percentages();
        let labels: Vec<String> = (0..table.counts.len()).map(|i| table.row_label(i)).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        for (label, row) in labels.iter().zip(&percentages) {
            let mut bar = String::new();
            for (j, pct) in row.iter().enumerate() {
                let len = (pct / 100.0 * self.width as f64).round() as usize;
                bar.extend(std::iter::repeat(FILLS[j % FILLS.len()]).take(len));
            }
            let shares: Vec<String> = table
                .column_labels
                .iter()
                .zip(row)
                .map(|(c, p)| format!("{} {:.1}%", c, p))
                .collect();
            writeln!(
                self.out,
                "      {:>lw$} │{:<w$}│ {}",
                label,
                bar,
                shares.join(", "),
                lw = label_width,
                w = self.width
            )?;
        }
        let legend: Vec<String> = table
            .column_labels
            .iter()
            .enumerate()
            .map(|(j, c)| format!("{} {}={}", FILLS[j % FILLS.len()], table.column_key, c))
            .collect();
        writeln!(self.out, "      {}", legend.join("  "))
    }

    fn missingness(&mut self, matrix: &MissingMatrix) -> io::Result<()> {
        let rows = matrix.is_null.len();
        let cells = self.width.min(rows.max(1));
        let label_width = matrix.columns.iter().map(|c| c.len()).max().unwrap_or(0);

        for (j, column) in matrix.columns.iter().enumerate() {
            // One character per bucket of rows; a bucket with any null shows blank
            let strip: String = (0..cells)
                .map(|b| {
                    let start = b * rows / cells;
                    let end = ((b + 1) * rows / cells).max(start + 1).min(rows);
                    let any_null = (start..end).any(|r| matrix.is_null[r][j]);
                    if any_null {
                        ' '
                    } else {
                        '█'
                    }
                })
                .collect();
            writeln!(
                self.out,
                "      {:>lw$} │{}│ {} missing",
                column,
                strip,
                matrix.null_count(j),
                lw = label_width
            )?;
        }
        Ok(())
    }
}

impl<W: Write> PlotSink for TerminalPlotter<W> {
    fn render(&mut self, plot: Plot<'_>) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "    {} {}", style("▤").cyan(), style(plot.title()).bold())?;
        match plot {
            Plot::Distribution(hist) => self.distribution(hist),
            Plot::BoxPlots { boxes, .. } => self.boxplots(boxes),
            Plot::Counts(counts) => self.counts(counts),
            Plot::Heatmap(matrix) => self.heatmap(matrix),
            Plot::StackedBars { table, .. } => self.stacked(table),
            Plot::Missingness(matrix) => self.missingness(matrix),
        }
    }
}
