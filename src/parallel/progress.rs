use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar over the iterations of a scaling experiment
#[derive(Clone)]
pub struct ExperimentProgress {
    bar: ProgressBar,
}

impl ExperimentProgress {
    /// Visible bar on stderr with `label` in front of it
    pub fn new(label: &str, total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(Self::style(label));
        Self { bar }
    }

    /// Bar that draws nothing (quiet mode and tests)
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden());
        Self { bar }
    }

    fn style(label: &str) -> ProgressStyle {
        ProgressStyle::with_template(&format!(
            "{label} [{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos:>3}}/{{len:3}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
    }

    /// Reporter callback in the `(current, total)` shape the scaling harness accepts
    pub fn reporter(&self) -> impl Fn(usize, usize) + '_ {
        move |current, total| self.update(current, total)
    }

    pub fn update(&self, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_tracks_updates() {
        let progress = ExperimentProgress::hidden(4);
        let report = progress.reporter();
        report(1, 4);
        report(3, 4);
        assert_eq!(progress.bar.position(), 3);
        assert_eq!(progress.bar.length(), Some(4));
        progress.finish();
    }

    #[test]
    fn test_visible_progress_builds() {
        let progress = ExperimentProgress::new("Strong scaling", 9);
        progress.update(1, 9);
        progress.finish();
    }
}
