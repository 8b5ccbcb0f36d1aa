use crate::{
    config::CompilerConfig,
    graph::label::Label,
    timeline::TimeWindow,
};

/// Statement separator in the graph text
pub const STATEMENT_SEPARATOR: &str = "; ";

/// Shortest round-trip rendering of a number, with `-0` folded to `0`
pub fn num(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Streams fragments read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInputs {
    pub video: String,
    pub overlay: String,
}

impl Default for StreamInputs {
    fn default() -> Self {
        Self::from_config(&CompilerConfig::default())
    }
}

impl StreamInputs {
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            video: config.video_input.clone(),
            overlay: config.overlay_input.clone(),
        }
    }

    /// `[0:v]trim=start=S:end=E,setpts=PTS-STARTPTS`
    pub fn trim(&self, window: &TimeWindow) -> String {
        trim_stream(&self.video, window)
    }

    /// Same window cut from the overlay stream
    pub fn trim_overlay(&self, window: &TimeWindow) -> String {
        trim_stream(&self.overlay, window)
    }
}

fn trim_stream(stream: &str, window: &TimeWindow) -> String {
    format!(
        "[{}]trim=start={}:end={},setpts=PTS-STARTPTS",
        stream,
        num(window.start),
        num(window.end)
    )
}

/// Graph text for one time window, ending in a single named output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFragment {
    pub statements: Vec<String>,
    pub output: Label,
}

impl GraphFragment {
    pub fn new(statements: Vec<String>, output: Label) -> Self {
        Self { statements, output }
    }

    /// One statement: `source,filter1,filter2[output]`
    ///
    /// With no filters the source is labelled as-is, which is the passthrough form.
    pub fn chain(source: String, filters: &[String], output: Label) -> Self {
        let mut statement = source;
        for filter in filters {
            statement.push(',');
            statement.push_str(filter);
        }
        statement.push_str(&output.reference());
        Self::new(vec![statement], output)
    }

    pub fn text(&self) -> String {
        self.statements.join(STATEMENT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(3.0), "3");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.0), "0");
        assert_eq!(num(-2.25), "-2.25");
    }

    #[test]
    fn test_trim_clause() {
        let inputs = StreamInputs::default();
        assert_eq!(
            inputs.trim(&TimeWindow::new(0.0, 3.5)),
            "[0:v]trim=start=0:end=3.5,setpts=PTS-STARTPTS"
        );
        assert!(inputs.trim_overlay(&TimeWindow::new(1.0, 2.0)).starts_with("[1:v]trim="));
    }

    #[test]
    fn test_chain_without_filters_is_passthrough() {
        let inputs = StreamInputs::default();
        let fragment = GraphFragment::chain(
            inputs.trim(&TimeWindow::new(2.0, 4.0)),
            &[],
            Label::new("seg1"),
        );
        assert_eq!(fragment.text(), "[0:v]trim=start=2:end=4,setpts=PTS-STARTPTS[seg1]");
    }

    #[test]
    fn test_chain_appends_filters_in_order() {
        let fragment = GraphFragment::chain(
            "[0:v]trim=start=0:end=1,setpts=PTS-STARTPTS".to_string(),
            &["hflip".to_string(), "gblur=sigma=2".to_string()],
            Label::new("seg0"),
        );
        assert_eq!(
            fragment.text(),
            "[0:v]trim=start=0:end=1,setpts=PTS-STARTPTS,hflip,gblur=sigma=2[seg0]"
        );
        assert_eq!(fragment.output.as_str(), "seg0");
    }
}
