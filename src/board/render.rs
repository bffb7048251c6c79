use chrono::{DateTime, TimeDelta, Utc};

use crate::dto::{NoteCard, NoteList, RenderedBoard};
use crate::models::Note;

pub const EMPTY_INVITATION: &str = "Add the first note and we'll share it with the group.";
pub const ANONYMOUS_NAME: &str = "Guest";

/// Rebuilds the visible list from scratch.
pub fn render_board(notes: &[Note], now: DateTime<Utc>) -> RenderedBoard {
    let list = if notes.is_empty() {
        NoteList::Empty {
            invitation: EMPTY_INVITATION.to_string(),
        }
    } else {
        NoteList::Notes {
            items: notes.iter().map(|note| render_note(note, now)).collect(),
        }
    };

    RenderedBoard {
        count: notes.len(),
        list,
    }
}

fn render_note(note: &Note, now: DateTime<Utc>) -> NoteCard {
    let name = if note.name.is_empty() {
        ANONYMOUS_NAME
    } else {
        note.name.as_str()
    };

    NoteCard {
        name: name.to_string(),
        message: note.message.clone(),
        when: relative_day(note.created, now),
    }
}

/// `Today`, `Yesterday`, or a short date like `Nov 5`.
pub fn relative_day(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now - created;

    if age < TimeDelta::days(1) {
        "Today".to_string()
    } else if age < TimeDelta::days(2) {
        "Yesterday".to_string()
    } else {
        created.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_list_renders_invitation() {
        let board = render_board(&[], now());
        assert_eq!(board.count, 0);
        assert_eq!(
            board.list,
            NoteList::Empty {
                invitation: EMPTY_INVITATION.to_string()
            }
        );
    }

    #[test]
    fn cards_keep_order_and_count() {
        let notes = vec![
            Note {
                name: String::new(),
                message: "first".to_string(),
                created: now() - TimeDelta::hours(5),
            },
            Note {
                name: "Sam & Lee".to_string(),
                message: "second".to_string(),
                created: now() - TimeDelta::hours(30),
            },
        ];

        let board = render_board(&notes, now());
        assert_eq!(board.count, 2);

        let NoteList::Notes { items } = board.list else {
            panic!("expected rendered notes");
        };
        assert_eq!(items[0].name, ANONYMOUS_NAME);
        assert_eq!(items[0].when, "Today");
        assert_eq!(items[1].name, "Sam & Lee");
        assert_eq!(items[1].when, "Yesterday");
    }

    #[test]
    fn older_notes_show_short_date() {
        let created = Utc.with_ymd_and_hms(2024, 11, 5, 8, 0, 0).unwrap();
        assert_eq!(relative_day(created, now()), "Nov 5");
    }
}
