// tests/exam_flow_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use wordquiz::{
    error::AppError,
    exam::{
        ExamClient, ExamEvent, Membership, Role, RowStatus, SessionCode, catalog, client, paths,
        submission,
    },
    models::{
        session::{Direction, ExamSession, ExamType},
        submission::{AnswerDetail, Submission},
    },
    store::{self, DocumentStore, MemoryStore},
};

const PUBLIC_URL: &str = "http://files.test";

/// Store seeded with one quiz (two word pairs) and two profiles.
async fn seeded_store() -> Arc<dyn DocumentStore> {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    store
        .set(
            "quizes/q1",
            json!({
                "title": "Animals",
                "firstLanguage": "English",
                "secondLanguage": "Norwegian",
                "createdBy": "teacher",
                "wordPairs": [
                    { "first": "dog", "second": "hund" },
                    { "first": "cat", "second": "katt" }
                ]
            }),
        )
        .await
        .unwrap();
    store
        .set("users/teacher", json!({ "name": "Ms. Berg", "avatar": "/uploads/t.png" }))
        .await
        .unwrap();
    store
        .set("users/student", json!({ "name": "Ola" }))
        .await
        .unwrap();
    store
}

fn device(store: &Arc<dyn DocumentStore>, uid: &str) -> ExamClient {
    ExamClient::new(store.clone(), uid, PUBLIC_URL)
}

async fn open_record(store: &Arc<dyn DocumentStore>, code: &SessionCode) -> Option<ExamSession> {
    store::read(&**store, &paths::open(code)).await.unwrap()
}

async fn running_record(store: &Arc<dyn DocumentStore>, code: &SessionCode) -> Option<ExamSession> {
    store::read(&**store, &paths::running(code)).await.unwrap()
}

fn launches(events: &[ExamEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ExamEvent::Launch(_)))
        .count()
}

#[tokio::test]
async fn full_exam_scenario() {
    // Arrange
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    // 1. Teacher hosts
    let code = teacher
        .create_session("q1", ExamType::Alternatives, Direction::First)
        .await
        .unwrap();
    assert_eq!(code.as_str().len(), 6);
    assert_eq!(open_record(&store, &code).await.unwrap().users, vec!["teacher"]);
    assert!(matches!(
        teacher.membership(),
        Membership::Lobby { role: Role::Teacher, .. }
    ));

    // 2. Student joins with lower-case input
    student
        .join_session(&code.as_str().to_lowercase())
        .await
        .unwrap();
    assert_eq!(
        open_record(&store, &code).await.unwrap().users,
        vec!["teacher", "student"]
    );

    // 3. Lobby poll shows both participants
    teacher.sync().await.unwrap();
    let names: Vec<_> = teacher.room().participants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ms. Berg", "Ola"]);
    assert_eq!(
        teacher.room().participants[0].avatar.as_deref(),
        Some("http://files.test/uploads/t.png")
    );

    // 4. Teacher starts: record moves from open to running
    assert!(teacher.start_session().await.unwrap());
    assert!(teacher.membership().is_started());
    assert!(open_record(&store, &code).await.is_none());
    let running = running_record(&store, &code).await.unwrap();
    assert_eq!(running.users, vec!["teacher", "student"]);
    assert_eq!(running.exam_type, ExamType::Alternatives);

    // 5. Student's next poll routes to the quiz
    let events = student.sync().await.unwrap();
    let launch = events
        .iter()
        .find_map(|e| match e {
            ExamEvent::Launch(l) => Some(l.clone()),
            _ => None,
        })
        .expect("student should be routed into the quiz");
    assert_eq!(launch.route(), "/alternatives");
    assert_eq!(launch.word_pairs.len(), 2);
    assert!(launch.word_pairs.iter().all(|p| p.selected));
    assert_eq!(launch.language, Direction::First);
    assert_eq!(launch.first_language, "English");
    assert_eq!(launch.second_language, "Norwegian");
    assert_eq!(launch.exam_id, code);
    assert!(student.membership().is_started());

    // 6. Student finishes with 1/2 correct
    let result = Submission::graded(vec![
        AnswerDetail {
            prompt: "hund".to_string(),
            correct_answer: "dog".to_string(),
            user_answer: "dog".to_string(),
            is_correct: true,
        },
        AnswerDetail {
            prompt: "katt".to_string(),
            correct_answer: "cat".to_string(),
            user_answer: "cow".to_string(),
            is_correct: false,
        },
    ]);
    submission::submit(&*store, &launch.exam_id, "student", &result)
        .await
        .unwrap();

    // 7. Teacher's poll shows the score
    teacher.sync().await.unwrap();
    let rows = teacher.room().rows("teacher", Role::Teacher, true);
    let student_row = rows.iter().find(|r| r.participant.uid == "student").unwrap();
    assert_eq!(
        student_row.status,
        RowStatus::Finished { score: 1, total: 2 }
    );
    assert_eq!(student_row.status.to_string(), "✓ Score: 1/2");
    assert!(student_row.can_view_results);
    assert_eq!(teacher.room().results_of("student"), Some(&result));

    // 8. Teacher closes: both records gone
    teacher.close_session().await.unwrap();
    assert!(open_record(&store, &code).await.is_none());
    assert!(running_record(&store, &code).await.is_none());
    assert_eq!(teacher.membership(), &Membership::Idle);
}

#[tokio::test]
async fn launch_fires_once_across_polls() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::Both)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    teacher.start_session().await.unwrap();

    let mut total = 0;
    for _ in 0..4 {
        total += launches(&student.sync().await.unwrap());
    }

    assert_eq!(total, 1);
    assert!(matches!(
        student.membership(),
        Membership::Live { role: Role::Student, .. }
    ));
}

#[tokio::test]
async fn join_with_unknown_code_is_rejected_without_state_change() {
    let store = seeded_store().await;
    let mut student = device(&store, "student");

    let err = student.join_session("ZZZZZZ").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(student.membership(), &Membership::Idle);

    let err = student.join_session("abc").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(student.membership(), &Membership::Idle);
}

#[tokio::test]
async fn rejoining_does_not_duplicate_member() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    student.join_session(code.as_str()).await.unwrap();

    assert_eq!(
        open_record(&store, &code).await.unwrap().users,
        vec!["teacher", "student"]
    );
}

#[tokio::test]
async fn sequential_joins_and_kicks_match_list_model() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();

    let mut model = vec!["teacher".to_string()];
    let ops: [(&str, bool); 8] = [
        ("a", true),
        ("b", true),
        ("a", false),
        ("c", true),
        ("b", true),
        ("d", true),
        ("c", false),
        ("a", true),
    ];

    for (uid, join) in ops {
        if join {
            device(&store, uid).join_session(code.as_str()).await.unwrap();
            if !model.iter().any(|m| m == uid) {
                model.push(uid.to_string());
            }
        } else {
            teacher.kick(uid).await.unwrap();
            model.retain(|m| m != uid);
        }
    }

    assert_eq!(open_record(&store, &code).await.unwrap().users, model);
}

#[tokio::test]
async fn kicked_student_goes_idle_without_launch() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    teacher.start_session().await.unwrap();

    // Drop the student from the running record before their next poll.
    let mut running = running_record(&store, &code).await.unwrap();
    running.remove_member("student");
    store::write(&*store, &paths::running(&code), &running)
        .await
        .unwrap();

    let events = student.sync().await.unwrap();
    assert_eq!(events, vec![ExamEvent::Removed]);
    assert_eq!(student.membership(), &Membership::Idle);
}

#[tokio::test]
async fn kick_in_lobby_removes_student_on_next_poll() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();

    assert!(teacher.kick("student").await.unwrap());
    assert!(!teacher.kick("student").await.unwrap());

    assert_eq!(student.sync().await.unwrap(), vec![ExamEvent::Removed]);
    assert!(!student.membership().is_active());
}

#[tokio::test]
async fn student_sees_session_end_after_close() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    teacher.close_session().await.unwrap();

    assert_eq!(student.sync().await.unwrap(), vec![ExamEvent::SessionEnded]);
    assert_eq!(student.membership(), &Membership::Idle);
}

#[tokio::test]
async fn close_is_idempotent() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    teacher.start_session().await.unwrap();

    teacher.close_session().await.unwrap();
    teacher.close_session().await.unwrap();
    client::delete_records(&*store, &code).await.unwrap();

    assert!(open_record(&store, &code).await.is_none());
    assert!(running_record(&store, &code).await.is_none());
    assert_eq!(store.get(paths::OPEN).await.unwrap(), None);
}

#[tokio::test]
async fn start_without_open_record_is_a_no_op() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    store.remove(&paths::open(&code)).await.unwrap();

    assert!(!teacher.start_session().await.unwrap());
    assert!(!teacher.membership().is_started());
    assert!(running_record(&store, &code).await.is_none());
}

#[tokio::test]
async fn running_record_wins_while_both_exist() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();

    // Halfway through a start: running written, open not yet deleted.
    let open = open_record(&store, &code).await.unwrap();
    store::write(&*store, &paths::running(&code), &open)
        .await
        .unwrap();

    let events = student.sync().await.unwrap();
    assert_eq!(launches(&events), 1);
}

#[tokio::test]
async fn teacher_only_operations_are_refused_for_students() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();

    assert!(matches!(student.start_session().await, Err(AppError::Forbidden(_))));
    assert!(matches!(student.kick("teacher").await, Err(AppError::Forbidden(_))));
    assert!(matches!(student.close_session().await, Err(AppError::Forbidden(_))));
    assert!(open_record(&store, &code).await.is_some());
}

#[tokio::test]
async fn student_leaving_lobby_drops_from_record() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    student.leave_session().await.unwrap();

    assert_eq!(student.membership(), &Membership::Idle);
    assert_eq!(open_record(&store, &code).await.unwrap().users, vec!["teacher"]);
}

#[tokio::test]
async fn student_roster_hides_teacher() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    student.sync().await.unwrap();

    let rows = student.room().rows("student", Role::Student, false);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant.uid, "student");
    assert!(!rows[0].can_kick);

    teacher.sync().await.unwrap();
    let rows = teacher.room().rows("teacher", Role::Teacher, false);
    assert_eq!(rows[0].status, RowStatus::Host);
    assert!(!rows[0].can_kick);
    assert!(rows[1].can_kick);
}

#[tokio::test]
async fn missing_profile_shows_anonymous() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    device(&store, "ghost").join_session(code.as_str()).await.unwrap();

    teacher.sync().await.unwrap();
    let ghost = &teacher.room().participants[1];
    assert_eq!(ghost.name, "Anonymous");
    assert_eq!(ghost.avatar, None);
}

#[tokio::test]
async fn submission_round_trip_and_overwrite() {
    let store = seeded_store().await;
    let code: SessionCode = "ABC123".parse().unwrap();

    let first = Submission::graded(vec![AnswerDetail {
        prompt: "hund".to_string(),
        correct_answer: "dog".to_string(),
        user_answer: String::new(),
        is_correct: false,
    }]);
    submission::submit(&*store, &code, "student", &first).await.unwrap();

    let listed = submission::list(&*store, &code).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.get("student"), Some(&first));

    let mut second = first.clone();
    second.score = 1;
    second.details[0].is_correct = true;
    submission::submit(&*store, &code, "student", &second).await.unwrap();

    let listed = submission::list(&*store, &code).await.unwrap();
    assert_eq!(listed.get("student"), Some(&second));
    assert!(listed.get("someone-else").is_none());
}

#[tokio::test]
async fn submission_wire_format() {
    let store = seeded_store().await;
    let code: SessionCode = "ABC123".parse().unwrap();
    let result = Submission::graded(vec![AnswerDetail {
        prompt: "katt".to_string(),
        correct_answer: "cat".to_string(),
        user_answer: "cat".to_string(),
        is_correct: true,
    }]);
    submission::submit(&*store, &code, "student", &result).await.unwrap();

    let raw = store.get("exams_end/ABC123/student").await.unwrap().unwrap();
    assert_eq!(raw["score"], 1);
    assert_eq!(raw["total"], 1);
    assert!(raw["timestamp"].is_i64());
    assert_eq!(raw["details"][0]["word"], "katt");
    assert_eq!(raw["details"][0]["correctAnswer"], "cat");
    assert_eq!(raw["details"][0]["userAnswer"], "cat");
    assert_eq!(raw["details"][0]["isCorrect"], true);
}

#[tokio::test]
async fn host_quiz_picker_lists_own_quizzes() {
    let store = seeded_store().await;
    store
        .set(
            "quizes/q2",
            json!({ "title": "Colors", "createdBy": "someone", "wordPairs": [] }),
        )
        .await
        .unwrap();

    let quizzes = catalog::list_host_quizzes(&*store, "teacher").await.unwrap();
    assert_eq!(quizzes.len(), 1);
    assert_eq!(quizzes[0].quiz_id, "q1");
    assert_eq!(quizzes[0].quiz.title, "Animals");
}

#[tokio::test]
async fn teacher_cannot_kick_themselves() {
    let store = seeded_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();

    assert!(matches!(teacher.kick("teacher").await, Err(AppError::Forbidden(_))));

    let record = open_record(&store, &code).await.unwrap();
    assert_eq!(record.users, vec!["teacher", "student"]);
    assert!(record.has_member(&record.teacher_id));
}

#[tokio::test]
async fn writing_screen_results_are_listed() {
    let store = seeded_store().await;
    let code: SessionCode = "ABC123".parse().unwrap();
    store
        .set(
            "exams_end/ABC123/student",
            json!({
                "score": 1,
                "total": 2,
                "finishedAt": "2025-03-01T10:15:30.250Z",
                "details": [
                    { "word": "hund", "correctAnswer": "dog", "userAnswer": "dog", "isCorrect": true },
                    { "word": "katt", "correctAnswer": "cat", "userAnswer": "", "isCorrect": false }
                ]
            }),
        )
        .await
        .unwrap();

    let listed = submission::list(&*store, &code).await.unwrap();
    let result = listed.get("student").expect("writing result should be listed");

    assert_eq!((result.score, result.total), (1, 2));
    assert_eq!(result.timestamp, None);
    assert_eq!(
        result.finished().unwrap().to_rfc3339(),
        "2025-03-01T10:15:30.250+00:00"
    );
}

#[tokio::test]
async fn submitted_timestamp_is_kept_to_the_millisecond() {
    let store = seeded_store().await;
    let code: SessionCode = "ABC123".parse().unwrap();
    let finished = Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 30).unwrap()
        + chrono::Duration::nanoseconds(250_123_456);

    let result = Submission {
        score: 0,
        total: 0,
        timestamp: Some(finished),
        finished_at: None,
        details: Vec::new(),
    };
    submission::submit(&*store, &code, "student", &result).await.unwrap();

    let listed = submission::list(&*store, &code).await.unwrap();
    assert_eq!(listed.get("student"), Some(&result.normalized()));
    assert_eq!(
        listed["student"].timestamp.unwrap().timestamp_subsec_nanos(),
        250_000_000
    );
}

/// Store operations a [`FlakyStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Get,
    Set,
    Remove,
}

/// In-memory store that fails chosen operations under a path prefix a given
/// number of times, then behaves normally again.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    faults: Mutex<Vec<(Op, String, usize)>>,
}

impl FlakyStore {
    async fn fail(&self, op: Op, prefix: &str, times: usize) {
        self.faults.lock().await.push((op, prefix.to_string(), times));
    }

    async fn check(&self, op: Op, path: &str) -> Result<(), AppError> {
        let mut faults = self.faults.lock().await;
        let hit = faults
            .iter_mut()
            .find(|(o, prefix, left)| *o == op && *left > 0 && path.starts_with(prefix.as_str()));

        match hit {
            Some(fault) => {
                fault.2 -= 1;
                Err(AppError::StoreUnavailable(format!("{:?} {} failed", op, path)))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, AppError> {
        self.check(Op::Get, path).await?;
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), AppError> {
        self.check(Op::Set, path).await?;
        self.inner.set(path, value).await
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        self.check(Op::Remove, path).await?;
        self.inner.remove(path).await
    }
}

/// A flaky store seeded like [`seeded_store`], plus the same store as a trait object.
async fn flaky_store() -> (Arc<FlakyStore>, Arc<dyn DocumentStore>) {
    let flaky = Arc::new(FlakyStore::default());
    flaky
        .set(
            "quizes/q1",
            json!({
                "firstLanguage": "English",
                "secondLanguage": "Norwegian",
                "wordPairs": [{ "first": "dog", "second": "hund" }]
            }),
        )
        .await
        .unwrap();
    flaky.set("users/student", json!({ "name": "Ola" })).await.unwrap();

    let store: Arc<dyn DocumentStore> = flaky.clone();
    (flaky, store)
}

/// Teacher hosting a started session that `student` joined while in the lobby.
async fn started_with_student(store: &Arc<dyn DocumentStore>) -> (ExamClient, ExamClient) {
    let mut teacher = device(store, "teacher");
    let mut student = device(store, "student");
    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    teacher.start_session().await.unwrap();
    (teacher, student)
}

#[tokio::test]
async fn launch_is_delivered_when_roster_read_fails() {
    // Arrange
    let (flaky, store) = flaky_store().await;
    let (_teacher, mut student) = started_with_student(&store).await;
    flaky.fail(Op::Get, "users/", 1).await;

    // Act
    let first = student.sync().await.unwrap();

    // Assert: routed despite the failed profile read, and never again
    assert_eq!(launches(&first), 1);
    assert!(student.membership().is_started());

    let mut later = 0;
    for _ in 0..3 {
        later += launches(&student.sync().await.unwrap());
    }
    assert_eq!(later, 0);
    assert_eq!(student.room().participants.len(), 2);
}

#[tokio::test]
async fn launch_is_delivered_when_submission_read_fails() {
    let (flaky, store) = flaky_store().await;
    let (_teacher, mut student) = started_with_student(&store).await;
    flaky.fail(Op::Get, "exams_end/", 1).await;

    let events = student.sync().await.unwrap();

    assert_eq!(launches(&events), 1);
    assert!(student.membership().is_started());
}

#[tokio::test]
async fn failed_quiz_read_retries_launch_next_tick() {
    let (flaky, store) = flaky_store().await;
    let (_teacher, mut student) = started_with_student(&store).await;
    flaky.fail(Op::Get, "quizes/", 1).await;

    let err = student.sync().await.unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));
    assert!(matches!(
        student.membership(),
        Membership::Lobby { role: Role::Student, .. }
    ));

    assert_eq!(launches(&student.sync().await.unwrap()), 1);
    assert!(student.membership().is_started());
}

#[tokio::test]
async fn failed_lobby_poll_leaves_state_untouched() {
    let (flaky, store) = flaky_store().await;
    let mut teacher = device(&store, "teacher");
    let mut student = device(&store, "student");
    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();
    student.join_session(code.as_str()).await.unwrap();
    student.sync().await.unwrap();

    let membership = student.membership().clone();
    let room = student.room().clone();
    flaky.fail(Op::Get, "exams_runing/", 1).await;

    assert!(student.sync().await.is_err());
    assert_eq!(student.membership(), &membership);
    assert_eq!(student.room(), &room);

    // Next tick recovers
    assert!(matches!(
        student.sync().await.unwrap().as_slice(),
        [ExamEvent::Synced(_)]
    ));
}

#[tokio::test]
async fn failed_create_and_join_keep_device_idle() {
    let (flaky, store) = flaky_store().await;
    let mut teacher = device(&store, "teacher");

    flaky.fail(Op::Set, "exams_open/", 1).await;
    assert!(teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .is_err());
    assert_eq!(teacher.membership(), &Membership::Idle);

    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();

    let mut student = device(&store, "student");
    flaky.fail(Op::Get, "exams_open/", 1).await;
    assert!(student.join_session(code.as_str()).await.is_err());
    assert_eq!(student.membership(), &Membership::Idle);

    flaky.fail(Op::Set, "exams_open/", 1).await;
    assert!(student.join_session(code.as_str()).await.is_err());
    assert_eq!(student.membership(), &Membership::Idle);
    assert_eq!(open_record(&store, &code).await.unwrap().users, vec!["teacher"]);
}

#[tokio::test]
async fn start_can_be_retried_when_lobby_delete_fails() {
    let (flaky, store) = flaky_store().await;
    let mut teacher = device(&store, "teacher");
    let code = teacher
        .create_session("q1", ExamType::Writing, Direction::First)
        .await
        .unwrap();

    flaky.fail(Op::Remove, "exams_open/", 1).await;
    assert!(teacher.start_session().await.is_err());
    assert!(!teacher.membership().is_started());
    assert!(running_record(&store, &code).await.is_some());
    assert!(open_record(&store, &code).await.is_some());

    assert!(teacher.start_session().await.unwrap());
    assert!(teacher.membership().is_started());
    assert!(open_record(&store, &code).await.is_none());
}

#[tokio::test]
async fn failed_submit_is_reported() {
    let (flaky, store) = flaky_store().await;
    let code: SessionCode = "ABC123".parse().unwrap();
    let result = Submission::graded(Vec::new());

    flaky.fail(Op::Set, "exams_end/", 1).await;
    let err = submission::submit(&*store, &code, "student", &result)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::StoreUnavailable(_)));
    assert!(submission::list(&*store, &code).await.unwrap().is_empty());
}
