//! Turn a selected analysis row into a link to the Lichess analysis board.

use crate::data::Row;

/// Back rank of the standard starting position, used when nothing is selected.
pub const DEFAULT_BACK_RANK: &str = "rnbqkbnr";

/// DFRC id of the standard starting position.
pub const DEFAULT_DFRC_ID: &str = "518";

const ANALYSIS_BOARD: &str = "https://lichess.org/analysis";

/// Identifiers of one DFRC position and the analysis URL built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisLink {
    pub white: String,
    pub black: String,
    pub dfrc_id: String,
    pub url: String,
}

impl AnalysisLink {
    /// URL variant for embedding the board, following the system theme.
    pub fn embed_url(&self) -> String {
        format!("{}&bg=system", self.url)
    }

    pub fn markdown(&self) -> String {
        format!("[Open lichess Analysis board for {}]({})", self.dfrc_id, self.url)
    }
}

/// Analysis-board URL for a position whose back ranks are `white` and `black`.
///
/// White's pieces are uppercased and black's lowercased as FEN requires. The
/// identifiers are not validated; a malformed one gives a malformed URL.
pub fn analysis_url(white: &str, black: &str) -> String {
    format!(
        "{ANALYSIS_BOARD}/{black}/pppppppp/8/8/8/8/PPPPPPPP/{white}_w_KQkq_-_0_1?color=white",
        black = black.to_lowercase(),
        white = white.to_uppercase(),
    )
}

/// Build the link for `row`, or for the standard position when `row` is
/// `None`. A field that is missing or null in the row takes its default.
pub fn format_link(row: Option<Row<'_>>) -> AnalysisLink {
    let white = row
        .and_then(|r| r.white())
        .unwrap_or(DEFAULT_BACK_RANK)
        .to_string();
    let black = row
        .and_then(|r| r.black())
        .unwrap_or(DEFAULT_BACK_RANK)
        .to_string();
    let dfrc_id = row
        .and_then(|r| r.dfrc_id())
        .unwrap_or_else(|| DEFAULT_DFRC_ID.to_string());

    let url = analysis_url(&white, &black);
    AnalysisLink {
        white,
        black,
        dfrc_id,
        url,
    }
}
