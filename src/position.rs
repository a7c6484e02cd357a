//! Open position model and the position panel's view logic.

use serde::Deserialize;

/// Text shown whenever there is no open position.
pub const NO_POSITION_TEXT: &str = "No open position.";

/// A numeric field exactly as the server sent it.
///
/// The bot sends numbers either as JSON strings (`"0.01"`) or as JSON numbers,
/// depending on the code path. Both are kept as text for display, and parsed
/// only when a sign or zero check is needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFigure")]
pub struct Figure(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFigure {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawFigure> for Figure {
    fn from(raw: RawFigure) -> Self {
        match raw {
            RawFigure::Text(text) => Figure(text),
            RawFigure::Number(number) => Figure(number.to_string()),
        }
    }
}

impl Figure {
    pub fn new(text: impl Into<String>) -> Self {
        Figure(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, if the text is a number.
    pub fn value(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }
}

/// Styling class for signed values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tone {
    /// Zero or positive.
    Success,
    /// Negative.
    Danger,
    /// Not a number.
    Neutral,
}

impl Tone {
    /// Classify by numeric sign. `-0.00` is zero, hence `Success`.
    pub fn classify(figure: &Figure) -> Tone {
        match figure.value() {
            Some(v) if v >= 0.0 => Tone::Success,
            Some(_) => Tone::Danger,
            None => Tone::Neutral,
        }
    }
}

/// Latest position as pushed by the server. Every field is optional so that
/// both the minimal and the extended payload shapes deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PositionSnapshot {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub quantity: Option<Figure>,
    #[serde(default)]
    pub entry_price: Option<Figure>,
    #[serde(default)]
    pub mark_price: Option<Figure>,
    #[serde(default)]
    pub pnl_usdt: Option<Figure>,
    #[serde(default)]
    pub roi_percent: Option<Figure>,
    #[serde(default)]
    pub sl_price: Option<Figure>,
    #[serde(default)]
    pub tp_price: Option<Figure>,
}

impl PositionSnapshot {
    /// An absent quantity, or one equal to zero, means no position.
    /// A quantity that is not a number still counts as open.
    pub fn is_open(&self) -> bool {
        match &self.quantity {
            None => false,
            Some(quantity) => quantity.value() != Some(0.0),
        }
    }
}

/// A labelled line of the position panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionField {
    pub label: &'static str,
    pub value: String,
    pub tone: Option<Tone>,
}

impl PositionField {
    fn plain(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            tone: None,
        }
    }
}

/// What the position panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionView {
    Empty,
    Open(Vec<PositionField>),
}

impl PositionView {
    /// One-line form for console output.
    pub fn summary(&self) -> String {
        match self {
            PositionView::Empty => NO_POSITION_TEXT.to_string(),
            PositionView::Open(fields) => fields
                .iter()
                .map(|field| format!("{}: {}", field.label, field.value))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// Holds the last snapshot. Each update replaces the previous one wholesale.
#[derive(Debug, Default)]
pub struct PositionPanel {
    snapshot: Option<PositionSnapshot>,
}

impl PositionPanel {
    pub fn render_position(&mut self, snapshot: Option<PositionSnapshot>) {
        self.snapshot = snapshot;
    }

    pub fn view(&self) -> PositionView {
        let Some(snapshot) = self.snapshot.as_ref().filter(|s| s.is_open()) else {
            return PositionView::Empty;
        };

        let missing = || "-".to_string();
        let text = |figure: &Option<Figure>| {
            figure
                .as_ref()
                .map(|f| f.as_str().to_string())
                .unwrap_or_else(missing)
        };
        let toned = |label: &'static str, figure: &Option<Figure>, suffix: &str| match figure {
            Some(f) => {
                let mut value = f.as_str().to_string();
                if !value.ends_with(suffix) {
                    value.push_str(suffix);
                }
                PositionField {
                    label,
                    value,
                    tone: Some(Tone::classify(f)),
                }
            }
            None => PositionField::plain(label, missing()),
        };

        let mut fields = vec![
            PositionField::plain(
                "Symbol",
                snapshot.symbol.clone().unwrap_or_else(missing),
            ),
            PositionField::plain("Size", text(&snapshot.quantity)),
            PositionField::plain("Entry Price", text(&snapshot.entry_price)),
        ];
        if let Some(mark) = &snapshot.mark_price {
            fields.push(PositionField::plain("Mark Price", mark.as_str().to_string()));
        }
        fields.push(toned("PNL (USDT)", &snapshot.pnl_usdt, ""));
        fields.push(toned("ROI", &snapshot.roi_percent, "%"));
        if let Some(sl) = &snapshot.sl_price {
            fields.push(PositionField::plain("Stop Loss", sl.as_str().to_string()));
        }
        if let Some(tp) = &snapshot.tp_price {
            fields.push(PositionField::plain("Take Profit", tp.as_str().to_string()));
        }
        PositionView::Open(fields)
    }
}
