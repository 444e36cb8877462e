use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{format_system_time, setup::InlineDocumentInput, validation::validate_keyword},
    state::{
        question::{Choice, ChoiceOptions, Grade, Question, QuestionRecord},
        quiz::{AnswerOutcome, PickedStudent, Quiz, TileView},
        state_machine::GameStatus,
    },
};

/// Payload used to start a round.
///
/// When `questions` is omitted they are generated from `keyword`, `grade` and
/// the optional reference material before the round begins.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartGameRequest {
    #[validate(custom(function = "validate_keyword"))]
    pub keyword: String,
    #[serde(default)]
    pub grade: Grade,
    /// Reviewed questions, one per keyword letter, in keyword order.
    #[serde(default)]
    pub questions: Option<Vec<QuestionRecord>>,
    /// Student names separated by newlines, commas or semicolons.
    #[serde(default)]
    pub roster_text: Option<String>,
    #[serde(default)]
    pub context_text: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub document: Option<InlineDocumentInput>,
}

/// Answer submitted for the question behind a tile.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AnswerRequest {
    /// Canonical position of the question (not the display slot).
    pub position: usize,
    pub choice: Choice,
}

/// Outcome of an answer submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerResponse {
    pub correct: bool,
    /// True when the answer had no effect (tile already open or round past play).
    pub ignored: bool,
    pub status: GameStatus,
    pub revealed_count: usize,
}

impl AnswerResponse {
    pub fn new(outcome: AnswerOutcome, quiz: &Quiz) -> Self {
        Self {
            correct: outcome.is_correct(),
            ignored: matches!(outcome, AnswerOutcome::Ignored(_)),
            status: quiz.status(),
            revealed_count: quiz
                .session()
                .map(|session| session.reveals().len())
                .unwrap_or_default(),
        }
    }
}

/// One tile on the board.
#[derive(Debug, Serialize, ToSchema)]
pub struct TileSnapshot {
    pub slot: usize,
    pub position: usize,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
}

impl From<TileView> for TileSnapshot {
    fn from(tile: TileView) -> Self {
        Self {
            slot: tile.slot,
            position: tile.position,
            revealed: tile.revealed,
            letter: tile.letter.map(String::from),
        }
    }
}

/// Everything the presentation layer needs to draw the board.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardResponse {
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    pub tiles: Vec<TileSnapshot>,
    pub revealed_count: usize,
    pub total: usize,
    pub complete: bool,
    pub roster_size: usize,
    /// Present once the keyword has been solved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl From<&Quiz> for BoardResponse {
    fn from(quiz: &Quiz) -> Self {
        let status = quiz.status();
        let Some(session) = quiz.session() else {
            return Self {
                status,
                session_id: None,
                started_at: None,
                grade: None,
                tiles: Vec::new(),
                revealed_count: 0,
                total: 0,
                complete: false,
                roster_size: 0,
                keyword: None,
            };
        };

        let total = session.keyword().len();
        let revealed_count = session.reveals().len();
        Self {
            status,
            session_id: Some(session.id()),
            started_at: Some(format_system_time(session.created_at())),
            grade: Some(session.grade()),
            tiles: session
                .tiles(status)
                .into_iter()
                .map(TileSnapshot::from)
                .collect(),
            revealed_count,
            total,
            complete: revealed_count == total,
            roster_size: session.roster().len(),
            keyword: (status == GameStatus::Solved).then(|| session.keyword().as_string()),
        }
    }
}

/// A question as shown to the class; the correct choice is never included.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionView {
    pub position: usize,
    pub prompt: String,
    pub options: ChoiceOptions,
    pub revealed: bool,
}

impl QuestionView {
    pub fn new(question: &Question, revealed: bool) -> Self {
        Self {
            position: question.position,
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            revealed,
        }
    }
}

/// Student drawn from the blind bag.
#[derive(Debug, Serialize, ToSchema)]
pub struct PickResponse {
    pub name: String,
    pub remaining: usize,
}

impl From<PickedStudent> for PickResponse {
    fn from(picked: PickedStudent) -> Self {
        Self {
            name: picked.name,
            remaining: picked.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{question::sample_record, quiz::GameSetup, roster::Roster};

    fn started_quiz() -> Quiz {
        let mut quiz = Quiz::new();
        quiz.start(GameSetup {
            keyword: "ai".into(),
            grade: Grade::Twelve,
            questions: vec![sample_record(Choice::A), sample_record(Choice::C)],
            roster: Roster::parse("Lan"),
        })
        .unwrap();
        quiz
    }

    #[test]
    fn empty_board_in_setup() {
        let board = BoardResponse::from(&Quiz::new());
        assert_eq!(board.status, GameStatus::Setup);
        assert!(board.tiles.is_empty());
        assert!(!board.complete);
        let json = serde_json::to_value(&board).unwrap();
        assert!(json.get("session_id").is_none());
        assert_eq!(json["status"], "setup");
    }

    #[test]
    fn board_hides_keyword_until_solved() {
        let mut quiz = started_quiz();
        let board = BoardResponse::from(&quiz);
        assert_eq!(board.total, 2);
        assert_eq!(board.roster_size, 1);
        assert!(board.keyword.is_none());
        assert!(board.tiles.iter().all(|tile| tile.letter.is_none()));

        quiz.answer(0, Choice::A).unwrap();
        quiz.answer(1, Choice::C).unwrap();
        quiz.solve().unwrap();
        let board = BoardResponse::from(&quiz);
        assert!(board.complete);
        assert_eq!(board.keyword.as_deref(), Some("AI"));
        let letters: Vec<_> = board.tiles.iter().filter_map(|t| t.letter.clone()).collect();
        assert_eq!(letters, vec!["A", "I"]);
    }

    #[test]
    fn question_view_never_carries_the_answer() {
        let quiz = started_quiz();
        let question = quiz.session().unwrap().question(0).unwrap();
        let json = serde_json::to_value(QuestionView::new(question, false)).unwrap();
        assert!(json.get("correct_choice").is_none());
        assert!(json.get("correctAnswer").is_none());
        assert_eq!(json["options"]["A"], question.options.a);
    }

    #[test]
    fn start_request_accepts_supplied_questions() {
        let request: StartGameRequest = serde_json::from_str(
            r#"{
                "keyword": "io",
                "grade": "10",
                "roster_text": "An, Bao",
                "questions": [
                    {"text":"Q1","options":{"A":"a","B":"b","C":"c","D":"d"},"correctAnswer":"A"},
                    {"text":"Q2","options":{"A":"a","B":"b","C":"c","D":"d"},"correctAnswer":"B"}
                ]
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.questions.map(|q| q.len()), Some(2));

        let blank: StartGameRequest = serde_json::from_str(r#"{"keyword":"  "}"#).unwrap();
        assert!(blank.validate().is_err());
    }
}
