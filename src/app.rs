//! Console front end
//!
//! [`Console`] is the event loop of the application. It owns two workers:
//!
//! - the query backend, fed with every submitted query
//! - the chart renderer, fed with every new result (or width change)
//!
//! and waits on three sources at once with `crossbeam_channel::select!`: the
//! line input, and the [`expose`](crate::latest::Worker::expose)d output of
//! each worker. Because both workers sit behind latest-value slots, typing
//! never waits on a query and a burst of queries only ever shows the newest
//! answer.
//!
//! # Input
//!
//! Each line is appended to the pending query. While parens are unbalanced
//! the query keeps growing; once balanced it is auto-indented and submitted.
//! Lines starting with `:` are commands:
//!
//! - `:width N` - re-render the chart at N columns
//! - `:sort label|value` - change bar ordering

use crate::config::{AppConfig, ChartConfig};
use crate::error::{BinnacleError, Result};
use crate::latest::Worker;
use crate::query::{backend_worker, format_query, QueryBackend, QueryResult, Sample, Selection};
use crate::render::{chart_worker, render_text, ChartFrame, ChartRequest, ChartSort};
use crossbeam_channel::{select, Receiver};
use std::io::Write;

/// Everything the console currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Last submitted (formatted) query
    pub query: String,
    /// Error from the last query, if it failed
    pub error: Option<String>,
    /// Warnings from the last successful query
    pub warnings: Vec<String>,
    /// Sorted text rendering of the current samples
    pub text: Vec<String>,
    /// Samples of the last successful query
    pub samples: Vec<Sample>,
    /// Most recent chart matching the current data and width
    pub chart: Option<ChartFrame>,
}

/// Console event loop state
pub struct Console {
    backend: Worker<String, QueryResult>,
    chart: Worker<ChartRequest, ChartFrame>,
    view: ViewState,
    chart_width: usize,
    sort: ChartSort,
    /// Lines of a query whose parens are not balanced yet
    pending: String,
}

impl Console {
    /// Create a console over existing workers
    pub fn new(
        backend: Worker<String, QueryResult>,
        chart: Worker<ChartRequest, ChartFrame>,
        chart_config: &ChartConfig,
    ) -> Self {
        Self {
            backend,
            chart,
            view: ViewState::default(),
            chart_width: chart_config.width,
            sort: chart_config.sort_by,
            pending: String::new(),
        }
    }

    /// Spawn both workers and build a console around `backend`
    pub fn spawn<B>(backend: B, config: &AppConfig) -> Result<Self>
    where
        B: QueryBackend + 'static,
    {
        let backend = backend_worker(backend)?;
        let chart = chart_worker()?;
        Ok(Self::new(backend, chart, &config.chart))
    }

    /// Current view
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current chart width
    pub fn chart_width(&self) -> usize {
        self.chart_width
    }

    /// Handle one line of input
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<()> {
        if self.pending.is_empty() {
            if let Some(command) = line.trim().strip_prefix(':') {
                return self.handle_command(command, out);
            }
        } else {
            self.pending.push('\n');
        }
        self.pending.push_str(line);

        if paren_balance(&self.pending) > 0 {
            return Ok(());
        }
        self.submit_pending(out)
    }

    /// Submit whatever is pending, balanced or not
    fn submit_pending(&mut self, out: &mut impl Write) -> Result<()> {
        let raw = std::mem::take(&mut self.pending);
        if raw.trim().is_empty() {
            return Ok(());
        }

        let caret = Selection::caret(raw.chars().count());
        let formatted = format_query(&raw, caret);
        if formatted.changed() {
            writeln!(out, "{}", formatted.text)?;
        }

        tracing::debug!(query = %formatted.text, "Submitting query");
        self.view.query = formatted.text.clone();
        self.backend.push(formatted.text);
        Ok(())
    }

    fn handle_command(&mut self, command: &str, out: &mut impl Write) -> Result<()> {
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("width"), Some(arg)) => match arg.parse::<usize>() {
                Ok(width) if width > 0 => {
                    self.chart_width = width;
                    self.request_chart();
                }
                _ => writeln!(out, "error: invalid width {:?}", arg)?,
            },
            (Some("sort"), Some("label")) => {
                self.sort = ChartSort::Label;
                self.request_chart();
            }
            (Some("sort"), Some("value")) => {
                self.sort = ChartSort::Value;
                self.request_chart();
            }
            _ => writeln!(out, "error: unknown command :{}", command)?,
        }
        Ok(())
    }

    /// Apply a query result to the view
    pub fn handle_result(&mut self, result: QueryResult, out: &mut impl Write) -> Result<()> {
        match result {
            Err(error) => {
                writeln!(out, "error: {}", error)?;
                self.view.error = Some(error);
                self.view.warnings.clear();
            }
            Ok(outcome) => {
                self.view.text = render_text(&outcome.samples);
                self.view.samples = outcome.samples;
                self.view.warnings = outcome.warnings;
                self.view.error = None;

                for warning in &self.view.warnings {
                    writeln!(out, "warning: {}", warning)?;
                }
                for line in &self.view.text {
                    writeln!(out, "{}", line)?;
                }
                self.request_chart();
            }
        }
        Ok(())
    }

    /// Apply a laid-out chart to the view
    pub fn handle_frame(&mut self, frame: ChartFrame, out: &mut impl Write) -> Result<()> {
        if frame.width != self.chart_width {
            // A request for the current width is already queued.
            tracing::trace!(frame = frame.width, current = self.chart_width, "Stale chart");
            return Ok(());
        }
        for line in &frame.lines {
            writeln!(out, "{}", line)?;
        }
        self.view.chart = Some(frame);
        Ok(())
    }

    fn request_chart(&mut self) {
        self.chart.push(ChartRequest {
            samples: self.view.samples.clone(),
            width: self.chart_width,
            sort: self.sort,
        });
    }

    /// Run until `lines` closes, then flush both workers.
    ///
    /// Returns the final view.
    pub fn run(mut self, lines: Receiver<String>, out: &mut impl Write) -> Result<ViewState> {
        let results = self.backend.expose();
        let frames = self.chart.expose();
        tracing::info!("Console started");

        loop {
            select! {
                recv(lines) -> msg => match msg {
                    Ok(line) => self.handle_line(&line, out)?,
                    Err(_) => break,
                },
                recv(results) -> msg => match msg {
                    Ok(result) => self.handle_result(result, out)?,
                    Err(_) => return Err(BinnacleError::Worker("query backend stopped".to_string())),
                },
                recv(frames) -> msg => match msg {
                    Ok(frame) => self.handle_frame(frame, out)?,
                    Err(_) => return Err(BinnacleError::Worker("chart renderer stopped".to_string())),
                },
            }
            out.flush()?;
        }

        tracing::info!("Input closed, draining workers");
        self.submit_pending(out)?;

        // The backend's last result may still request a chart, so drain it first.
        self.backend.close();
        while let Some(result) = self.backend.pull() {
            self.handle_result(result, out)?;
        }
        self.chart.close();
        while let Some(frame) = self.chart.pull() {
            self.handle_frame(frame, out)?;
        }
        out.flush()?;

        Ok(self.view)
    }
}

/// Open minus close parens
fn paren_balance(text: &str) -> i64 {
    text.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}
