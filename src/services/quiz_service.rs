//! Business logic behind the `/game` routes. Every mutation goes through
//! [`AppState::with_quiz`](crate::state::AppState::with_quiz) so that quiz
//! notifications reach the SSE stream once the lock is released.

use tracing::info;

use crate::{
    dto::game::{
        AnswerRequest, AnswerResponse, BoardResponse, PickResponse, QuestionView, StartGameRequest,
    },
    error::ServiceError,
    generator::GenerationRequest,
    services::generation_service::{checked_keyword, request_questions},
    state::{SharedState, quiz::GameSetup, roster::Roster},
};

/// Start a round with supplied questions, or generate them first.
pub async fn start_game(
    state: &SharedState,
    payload: StartGameRequest,
) -> Result<BoardResponse, ServiceError> {
    let keyword = checked_keyword(state, &payload.keyword)?;
    let roster = Roster::parse(payload.roster_text.as_deref().unwrap_or_default());

    if let Some(questions) = payload.questions {
        let setup = GameSetup {
            keyword: payload.keyword,
            grade: payload.grade,
            questions,
            roster,
        };
        return state
            .with_quiz(|quiz| {
                quiz.start(setup)?;
                Ok(BoardResponse::from(&*quiz))
            })
            .await;
    }

    let generator = state.generator().ok_or(ServiceError::Degraded)?;
    info!(letters = keyword.len(), "generating questions for a new round");
    let request = GenerationRequest {
        keyword,
        grade: payload.grade,
        context_text: payload.context_text,
        document: payload.document.map(Into::into),
    };
    let raw_keyword = payload.keyword;
    let grade = payload.grade;

    state
        .run_start(
            move || async move {
                let questions = request_questions(generator.as_ref(), request).await?;
                Ok(GameSetup {
                    keyword: raw_keyword,
                    grade,
                    questions,
                    roster,
                })
            },
            |quiz| BoardResponse::from(quiz),
        )
        .await
}

/// Current board.
pub async fn board(state: &SharedState) -> BoardResponse {
    state.read_quiz(|quiz| BoardResponse::from(quiz)).await
}

/// Prompt and options for the question behind canonical `position`.
pub async fn question(state: &SharedState, position: usize) -> Result<QuestionView, ServiceError> {
    state
        .read_quiz(|quiz| {
            let session = quiz
                .session()
                .ok_or_else(|| ServiceError::InvalidState("no game is in progress".into()))?;
            let question = session.question(position).ok_or_else(|| {
                ServiceError::NotFound(format!("no question at position {position}"))
            })?;
            Ok(QuestionView::new(
                question,
                session.reveals().contains(position),
            ))
        })
        .await
}

/// Score an answer.
pub async fn answer(
    state: &SharedState,
    payload: AnswerRequest,
) -> Result<AnswerResponse, ServiceError> {
    state
        .with_quiz(|quiz| {
            let outcome = quiz.answer(payload.position, payload.choice)?;
            Ok(AnswerResponse::new(outcome, quiz))
        })
        .await
}

/// Decode the keyword once every tile is showing.
pub async fn solve(state: &SharedState) -> Result<BoardResponse, ServiceError> {
    state
        .with_quiz(|quiz| {
            quiz.solve()?;
            Ok(BoardResponse::from(&*quiz))
        })
        .await
}

/// Hide and re-shuffle every tile.
pub async fn reset(state: &SharedState) -> Result<BoardResponse, ServiceError> {
    state
        .with_quiz(|quiz| {
            quiz.reset_progress()?;
            Ok(BoardResponse::from(&*quiz))
        })
        .await
}

/// Discard the round and go back to the setup screen.
pub async fn home(state: &SharedState) -> Result<BoardResponse, ServiceError> {
    state
        .with_quiz(|quiz| {
            quiz.back_to_setup()?;
            Ok(BoardResponse::from(&*quiz))
        })
        .await
}

/// Draw a student from the blind bag.
pub async fn pick_student(state: &SharedState) -> Result<PickResponse, ServiceError> {
    state
        .with_quiz(|quiz| quiz.pick_student().map(PickResponse::from))
        .await
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        config::AppConfig,
        generator::QuestionGenerator,
        services::test_support::StubGenerator,
        state::{
            AppState,
            question::{Choice, Grade, sample_record},
            state_machine::GameStatus,
        },
    };

    fn start_request(keyword: &str, questions: Option<Vec<Choice>>) -> StartGameRequest {
        StartGameRequest {
            keyword: keyword.into(),
            grade: Grade::Ten,
            questions: questions.map(|choices| choices.into_iter().map(sample_record).collect()),
            roster_text: Some("Anh, Binh;\nChi".into()),
            context_text: None,
            document: None,
        }
    }

    fn with_generator(generator: impl QuestionGenerator + 'static, config: AppConfig) -> SharedState {
        AppState::new(config, Some(Arc::new(generator)))
    }

    async fn status(state: &SharedState) -> GameStatus {
        state.read_quiz(|quiz| quiz.status()).await
    }

    #[tokio::test]
    async fn supplied_questions_start_without_generator() {
        let state = AppState::new(AppConfig::default(), None);
        let board = start_game(&state, start_request("a i", Some(vec![Choice::B, Choice::D])))
            .await
            .unwrap();
        assert_eq!(board.status, GameStatus::Playing);
        assert_eq!(board.total, 2);
        assert_eq!(board.roster_size, 3);
    }

    #[tokio::test]
    async fn generated_start_without_generator_is_degraded() {
        let state = AppState::new(AppConfig::default(), None);
        assert!(matches!(
            start_game(&state, start_request("ai", None)).await,
            Err(ServiceError::Degraded)
        ));
        assert_eq!(status(&state).await, GameStatus::Setup);
    }

    #[tokio::test]
    async fn generated_round_plays_to_the_end() {
        let state = with_generator(
            StubGenerator::answering(vec![Choice::B, Choice::D]),
            AppConfig::default(),
        );
        let mut events = state.events().subscribe();

        let board = start_game(&state, start_request("a i", None)).await.unwrap();
        assert_eq!(board.status, GameStatus::Playing);

        let first = answer(
            &state,
            AnswerRequest {
                position: 0,
                choice: Choice::A,
            },
        )
        .await
        .unwrap();
        assert!(!first.correct && !first.ignored);

        for (position, choice) in [(0, Choice::B), (1, Choice::D)] {
            answer(&state, AnswerRequest { position, choice }).await.unwrap();
        }
        assert_eq!(status(&state).await, GameStatus::Revealed);

        let repeat = answer(
            &state,
            AnswerRequest {
                position: 1,
                choice: Choice::D,
            },
        )
        .await
        .unwrap();
        assert!(repeat.ignored);
        assert_eq!(repeat.revealed_count, 2);

        let solved = solve(&state).await.unwrap();
        assert_eq!(solved.keyword.as_deref(), Some("AI"));

        let mut names = Vec::new();
        while let Ok(event) = events.try_recv() {
            names.extend(event.event);
        }
        assert_eq!(
            names,
            vec![
                "game.started",
                "answer.wrong",
                "tile.revealed",
                "tile.revealed",
                "game.revealed",
                "game.solved",
            ]
        );
    }

    #[tokio::test]
    async fn generator_failure_leaves_setup() {
        let state = with_generator(StubGenerator::failing(), AppConfig::default());
        assert!(matches!(
            start_game(&state, start_request("ai", None)).await,
            Err(ServiceError::Unavailable(_))
        ));
        assert_eq!(status(&state).await, GameStatus::Setup);
        assert!(state.read_quiz(|quiz| quiz.session().is_none()).await);

        // the aborted plan must not block the next attempt
        let board = start_game(&state, start_request("ai", Some(vec![Choice::A, Choice::A])))
            .await
            .unwrap();
        assert_eq!(board.status, GameStatus::Playing);
    }

    #[tokio::test]
    async fn wrong_question_count_leaves_setup() {
        let state = with_generator(
            StubGenerator::answering(vec![Choice::A]),
            AppConfig::default(),
        );
        assert!(start_game(&state, start_request("ram", None)).await.is_err());
        assert_eq!(status(&state).await, GameStatus::Setup);
    }

    #[tokio::test]
    async fn generation_timeout_aborts_the_start() {
        let config = AppConfig::default().with_generation_timeout(Duration::from_millis(20));
        let state = with_generator(
            StubGenerator::delayed(vec![Choice::A, Choice::B], Duration::from_secs(5)),
            config,
        );
        assert!(matches!(
            start_game(&state, start_request("ai", None)).await,
            Err(ServiceError::Timeout)
        ));
        assert_eq!(status(&state).await, GameStatus::Setup);
        assert_eq!(state.read_quiz(|quiz| quiz.snapshot().pending).await, None);
    }

    #[tokio::test]
    async fn actions_are_refused_while_questions_are_generated() {
        let (generator, release) = StubGenerator::gated(vec![Choice::C, Choice::C]);
        let state = with_generator(generator, AppConfig::default());

        let starting = tokio::spawn({
            let state = state.clone();
            async move { start_game(&state, start_request("ai", None)).await }
        });

        while state.read_quiz(|quiz| quiz.snapshot().pending).await.is_none() {
            tokio::task::yield_now().await;
        }
        assert!(matches!(home(&state).await, Err(ServiceError::InvalidState(_))));
        assert!(matches!(
            start_game(&state, start_request("ai", Some(vec![Choice::A, Choice::A]))).await,
            Err(ServiceError::InvalidState(_))
        ));

        release.send(()).unwrap();
        let board = starting.await.unwrap().unwrap();
        assert_eq!(board.status, GameStatus::Playing);
    }

    #[tokio::test]
    async fn cancelled_generation_returns_to_setup() {
        let (generator, _release) = StubGenerator::gated(vec![Choice::C, Choice::C]);
        let state = with_generator(generator, AppConfig::default());

        let starting = tokio::spawn({
            let state = state.clone();
            async move { start_game(&state, start_request("ai", None)).await }
        });
        while state.read_quiz(|quiz| quiz.snapshot().pending).await.is_none() {
            tokio::task::yield_now().await;
        }

        starting.abort();
        assert!(starting.await.unwrap_err().is_cancelled());

        tokio::time::timeout(Duration::from_secs(1), async {
            while state.read_quiz(|quiz| quiz.snapshot().pending).await.is_some() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(status(&state).await, GameStatus::Setup);

        let board = start_game(&state, start_request("ai", Some(vec![Choice::A, Choice::B])))
            .await
            .unwrap();
        assert_eq!(board.status, GameStatus::Playing);
        assert_eq!(home(&state).await.unwrap().status, GameStatus::Setup);
    }

    #[tokio::test]
    async fn question_view_and_errors() {
        let state = AppState::new(AppConfig::default(), None);
        assert!(matches!(
            question(&state, 0).await,
            Err(ServiceError::InvalidState(_))
        ));

        start_game(&state, start_request("ai", Some(vec![Choice::A, Choice::B])))
            .await
            .unwrap();
        let view = question(&state, 1).await.unwrap();
        assert_eq!(view.position, 1);
        assert!(!view.revealed);
        assert!(matches!(
            question(&state, 2).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            answer(
                &state,
                AnswerRequest {
                    position: 7,
                    choice: Choice::A
                }
            )
            .await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn roster_and_navigation() {
        let state = AppState::new(AppConfig::default(), None);
        assert!(matches!(
            pick_student(&state).await,
            Err(ServiceError::InvalidState(_))
        ));

        start_game(&state, start_request("ai", Some(vec![Choice::A, Choice::B])))
            .await
            .unwrap();
        for remaining in (0..3).rev() {
            assert_eq!(pick_student(&state).await.unwrap().remaining, remaining);
        }
        assert!(matches!(
            pick_student(&state).await,
            Err(ServiceError::InvalidState(_))
        ));

        assert!(matches!(solve(&state).await, Err(ServiceError::InvalidState(_))));
        assert_eq!(reset(&state).await.unwrap().status, GameStatus::Playing);
        let board = home(&state).await.unwrap();
        assert_eq!(board.status, GameStatus::Setup);
        assert!(board.tiles.is_empty());
    }
}
