mod game_vm;
mod history_vm;
mod time_fmt;

pub use game_vm::{
    ANSWER_ROWS, AnswerOption, ScoreLineVm, note_for_key, score_line, timer_label,
};
pub use history_vm::{HistoryRowVm, map_history_rows};
pub use time_fmt::{format_clock, format_date};
