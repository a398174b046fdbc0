use log::{info, warn};

/// Codes at or above this many characters can still be imported by the jukebox, but not saved.
pub const MAX_SAVE_LENGTH: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthReport {
    pub length: usize,
    pub savable: bool,
}

pub fn check_length(code: &str) -> LengthReport {
    let length = code.chars().count();
    LengthReport {
        length,
        savable: length < MAX_SAVE_LENGTH,
    }
}

/// Logs the character count of a finished code, warning when it is too long to save in-game.
pub fn report_length(code: &str) -> LengthReport {
    let report = check_length(code);
    info!("Character length: {}", report.length);

    if !report.savable {
        warn!(
            "Code is {} characters; it must be under {} to be saved in-game (it can still be imported)..!",
            report.length, MAX_SAVE_LENGTH
        );
    }
    info!(
        "Codes generated here are usually much longer than what the game produces. Import it and copy it again before sharing..!"
    );

    report
}
