use std::time::Instant;

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

pub fn prettyprint_time(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

struct TimerSpan {
    name: String,
    started_at: Instant,
    nested_results: Vec<String>,
}

/// Narrates a batch job through the `log` crate. Spans nest; when the Timer is dropped, the tree
/// of span durations is printed, followed by every note and warning collected along the way, so
/// nothing interesting gets lost in the scrollback.
pub struct Timer {
    results: Vec<String>,
    stack: Vec<TimerSpan>,

    outermost_name: String,

    notes: Vec<String>,
    warnings: Vec<String>,
}

impl Timer {
    pub fn new<I: AsRef<str>>(name: I) -> Timer {
        let mut t = Timer {
            results: Vec::new(),
            stack: Vec::new(),
            outermost_name: name.as_ref().to_string(),
            notes: Vec::new(),
            warnings: Vec::new(),
        };
        t.start(name);
        t
    }

    // TODO Shouldn't use this much.
    pub fn throwaway() -> Timer {
        Timer::new("throwaway")
    }

    /// Log immediately, but also repeat at the end.
    pub fn note(&mut self, line: String) {
        info!("{}", line);
        self.notes.push(line);
    }

    /// Log immediately as a warning, but also repeat at the end.
    pub fn warn(&mut self, line: String) {
        warn!("{}", line);
        self.warnings.push(line);
    }

    pub fn num_warnings(&self) -> usize {
        self.warnings.len()
    }

    pub fn start<I: AsRef<str>>(&mut self, name: I) {
        debug!("{}...", name.as_ref());
        self.stack.push(TimerSpan {
            name: name.as_ref().to_string(),
            started_at: Instant::now(),
            nested_results: Vec::new(),
        });
    }

    pub fn stop<I: AsRef<str>>(&mut self, name: I) {
        let span = match self.stack.pop() {
            Some(span) => span,
            None => {
                error!("Timer stop({}) without a matching start", name.as_ref());
                return;
            }
        };
        assert_eq!(span.name, name.as_ref());
        let line = format!(
            "{} took {}",
            span.name,
            prettyprint_time(elapsed_seconds(span.started_at))
        );
        debug!("{}", line);

        let padding = "  ".repeat(self.stack.len());
        let mut lines = vec![format!("{}- {}", padding, line)];
        lines.extend(span.nested_results);
        match self.stack.last_mut() {
            Some(parent) => parent.nested_results.extend(lines),
            None => self.results.extend(lines),
        }
    }
}

impl std::ops::Drop for Timer {
    fn drop(&mut self) {
        // If we're in the middle of unwinding a panic, don't further blow up.
        if std::thread::panicking() {
            return;
        }
        while self.stack.len() > 1 {
            if let Some(span) = self.stack.last() {
                let name = span.name.clone();
                warn!("Timer span {} was never stopped", name);
                self.stop(name);
            }
        }
        let name = self.outermost_name.clone();
        self.stop(name);

        for line in &self.results {
            info!("{}", line);
        }
        if !self.notes.is_empty() {
            info!("{} notes:", self.notes.len());
            for line in &self.notes {
                info!("  {}", line);
            }
        }
        if !self.warnings.is_empty() {
            info!("{} warnings:", self.warnings.len());
            for line in &self.warnings {
                info!("  {}", line);
            }
        }
    }
}
