//! 存储层事务与幂等性测试（内存 SQLite）

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_vlab_next::models::achievements::requests::{
    AwardAchievementRequest, CreateAchievementRequest,
};
use rust_vlab_next::models::activity_logs::entities::ActivityEntry;
use rust_vlab_next::models::activity_logs::requests::ActivityLogListParams;
use rust_vlab_next::models::common::PaginationQuery;
use rust_vlab_next::models::courses::requests::{
    CourseListParams, CourseVisibility, CreateCourseRequest, ScheduleInput,
};
use rust_vlab_next::models::labs::entities::LabSessionStatus;
use rust_vlab_next::models::exercises::entities::AnswerDetail;
use rust_vlab_next::models::labs::requests::{
    AnnotateRequest, CreateLabRequest, CriterionInput, ManualScoreRequest, ScoreLabRequest,
};
use rust_vlab_next::models::schools::requests::SchoolRecord;
use rust_vlab_next::models::simulations::requests::CreateSimulationRequest;
use rust_vlab_next::models::users::entities::UserRole;
use rust_vlab_next::models::users::requests::CreateUserRequest;
use rust_vlab_next::storage::{
    AnnotateOutcome, AwardOutcome, EnrollOutcome, GradedSubmission, LabScoreOutcome,
    LabStartOutcome, LabSubmitOutcome, NewExerciseSubmission, ScoreActor, Storage,
};

fn course_request(code: &str, schedules: Vec<ScheduleInput>) -> CreateCourseRequest {
    CreateCourseRequest {
        code: code.to_string(),
        title: "Chemistry".to_string(),
        description: None,
        subject: Some("chemistry".to_string()),
        grade_level: Some("11".to_string()),
        school_id: None,
        instructor_id: None,
        status: None,
        schedules,
    }
}

fn schedule(instructor_id: Option<i64>) -> ScheduleInput {
    ScheduleInput {
        day_of_week: 2,
        start_time: "10:00".to_string(),
        end_time: "11:00".to_string(),
        room: Some("B-204".to_string()),
        instructor_id,
    }
}

fn lab_request(course_id: i64, max_attempts: Option<i32>) -> CreateLabRequest {
    CreateLabRequest {
        course_id,
        simulation_id: None,
        title: "Free fall".to_string(),
        description: None,
        instructions: None,
        duration_minutes: Some(45),
        max_attempts,
        is_published: true,
        criteria: vec![CriterionInput {
            name: "Gravity".to_string(),
            description: None,
            max_points: 10.0,
            weight: None,
            response_key: Some("g".to_string()),
            expected_value: Some("9.8".to_string()),
        }],
    }
}

fn log_filter(action: &str) -> ActivityLogListParams {
    ActivityLogListParams {
        pagination: PaginationQuery::default(),
        user_id: None,
        action: Some(action.to_string()),
        resource_type: None,
        status: None,
        severity: None,
    }
}

/// 开始实验并返回会话 ID
async fn started_session(storage: &Arc<dyn Storage>, lab_id: i64, student_id: i64) -> i64 {
    match storage.start_lab(lab_id, student_id).await.expect("start") {
        LabStartOutcome::Started { session, .. } => session.id,
        other => panic!("start should succeed, got {other:?}"),
    }
}

/// 提交并自动评分，返回 (实验, 评分标准 ID 列表)
async fn scored_lab(
    storage: &Arc<dyn Storage>,
    teacher: i64,
    student: i64,
    course: i64,
    responses: serde_json::Value,
) -> (i64, Vec<i64>) {
    let mut request = lab_request(course, None);
    request.criteria.push(CriterionInput {
        name: "Units".to_string(),
        description: None,
        max_points: 5.0,
        weight: None,
        response_key: Some("unit".to_string()),
        expected_value: Some("m/s^2".to_string()),
    });
    let lab = storage.create_lab(request, Some(teacher)).await.expect("lab");
    let session_id = started_session(storage, lab.lab.id, student).await;
    storage
        .submit_lab(lab.lab.id, student, session_id, responses)
        .await
        .expect("submit");

    let outcome = storage
        .score_lab(
            lab.lab.id,
            ScoreLabRequest {
                student_id: student,
                submission_id: None,
            },
            ScoreActor {
                user_id: teacher,
                can_grade_all: false,
            },
            ActivityEntry::new("lab.score").user(Some(teacher)),
        )
        .await
        .expect("score");
    assert!(matches!(outcome, LabScoreOutcome::Scored { .. }));
    (lab.lab.id, lab.criteria.iter().map(|c| c.id).collect())
}

/// 教师开课、学生选课后返回 (教师, 学生, 课程)
async fn enrolled_course(storage: &Arc<dyn Storage>, code: &str) -> (i64, i64, i64) {
    let teacher = common::create_user(storage, &format!("{code}-teacher"), UserRole::Teacher).await;
    let student = common::create_user(storage, &format!("{code}-student"), UserRole::Student).await;
    let mut request = course_request(code, vec![]);
    request.instructor_id = Some(teacher.id);
    let course = storage.create_course(request).await.expect("course");
    let outcome = storage
        .enroll_student(course.course.id, student.id)
        .await
        .expect("enroll");
    assert!(matches!(outcome, EnrollOutcome::Enrolled(_)));
    (teacher.id, student.id, course.course.id)
}

#[actix_web::test]
async fn test_school_upsert_is_idempotent() {
    let storage = common::memory_storage().await;
    let record = |name: &str| SchoolRecord {
        school_code: "KH-PP-001".to_string(),
        school_name: name.to_string(),
        school_name_en: None,
        province: "Phnom Penh".to_string(),
        district: None,
        commune: None,
        village: None,
        phone: None,
        email: None,
    };

    let first = storage.upsert_school(record("Old name")).await.expect("upsert");
    let second = storage.upsert_school(record("New name")).await.expect("upsert");
    assert_eq!(first.id, second.id);

    let stored = storage
        .get_school_by_id(first.id)
        .await
        .expect("get")
        .expect("school exists");
    assert_eq!(stored.school_name, "New name");
}

#[actix_web::test]
async fn test_user_upsert_is_idempotent() {
    let storage = common::memory_storage().await;
    let request = |email: &str| CreateUserRequest {
        username: "bopha".to_string(),
        email: email.to_string(),
        password: "hash".to_string(),
        first_name: "Bopha".to_string(),
        last_name: "Keo".to_string(),
        phone: None,
        role: UserRole::Student,
        school_id: None,
    };

    let first = storage.upsert_user(request("a@lab.test")).await.expect("upsert");
    let second = storage.upsert_user(request("b@lab.test")).await.expect("upsert");
    assert_eq!(first.id, second.id);
    assert_eq!(second.email, "b@lab.test");
}

#[actix_web::test]
async fn test_course_with_bad_schedule_rolls_back() {
    let storage = common::memory_storage().await;

    // 时间表引用不存在的教师，外键失败
    let result = storage
        .create_course(course_request("CHEM-201", vec![schedule(None), schedule(Some(9999))]))
        .await;
    assert!(result.is_err());

    let listed = storage
        .list_courses_with_pagination(
            CourseListParams {
                pagination: PaginationQuery::default(),
                school_id: None,
                instructor_id: None,
                status: None,
                search: None,
            },
            CourseVisibility::All,
        )
        .await
        .expect("list");
    assert_eq!(listed.pagination.total, 0);

    // 同一代码可以重新创建
    let created = storage
        .create_course(course_request("CHEM-201", vec![schedule(None)]))
        .await
        .expect("create");
    assert_eq!(created.schedules.len(), 1);
}

#[actix_web::test]
async fn test_lab_start_resumes_and_limits_attempts() {
    let storage = common::memory_storage().await;
    let (_, student, course) = enrolled_course(&storage, "PHY-A").await;
    let lab = storage
        .create_lab(lab_request(course, Some(1)), None)
        .await
        .expect("lab");

    let LabStartOutcome::Started {
        session,
        is_resuming,
        criteria,
        ..
    } = storage.start_lab(lab.lab.id, student).await.expect("start")
    else {
        panic!("first start should succeed");
    };
    assert!(!is_resuming);
    assert_eq!(criteria.len(), 1);

    let LabStartOutcome::Started {
        session: resumed,
        is_resuming,
        ..
    } = storage.start_lab(lab.lab.id, student).await.expect("start")
    else {
        panic!("second start should resume");
    };
    assert!(is_resuming);
    assert_eq!(resumed.id, session.id);

    let stopped = storage
        .stop_lab(lab.lab.id, student, session.id)
        .await
        .expect("stop")
        .expect("session exists");
    assert_ne!(stopped.status, LabSessionStatus::InProgress);

    match storage.start_lab(lab.lab.id, student).await.expect("start") {
        LabStartOutcome::AttemptsExceeded(attempts) => {
            assert_eq!(attempts.attempts_used, 1);
            assert_eq!(attempts.max_attempts, 1);
        }
        other => panic!("expected attempts exceeded, got {other:?}"),
    }
}

#[actix_web::test]
async fn test_lab_start_requires_enrollment() {
    let storage = common::memory_storage().await;
    let (_, _, course) = enrolled_course(&storage, "PHY-B").await;
    let outsider = common::create_user(&storage, "outsider", UserRole::Student).await;
    let lab = storage
        .create_lab(lab_request(course, None), None)
        .await
        .expect("lab");

    let outcome = storage.start_lab(lab.lab.id, outsider.id).await.expect("start");
    assert!(matches!(outcome, LabStartOutcome::NotEnrolled));
}

#[actix_web::test]
async fn test_scoring_writes_score_and_log_together() {
    let storage = common::memory_storage().await;
    let (teacher, student, course) = enrolled_course(&storage, "PHY-C").await;
    let lab = storage
        .create_lab(lab_request(course, None), Some(teacher))
        .await
        .expect("lab");

    let LabStartOutcome::Started { session, .. } =
        storage.start_lab(lab.lab.id, student).await.expect("start")
    else {
        panic!("start should succeed");
    };
    let submitted = storage
        .submit_lab(lab.lab.id, student, session.id, serde_json::json!({ "g": "9.81" }))
        .await
        .expect("submit");
    assert!(matches!(submitted, LabSubmitOutcome::Saved { .. }));

    let actor = ScoreActor {
        user_id: teacher,
        can_grade_all: false,
    };
    let outcome = storage
        .score_lab(
            lab.lab.id,
            ScoreLabRequest {
                student_id: student,
                submission_id: None,
            },
            actor,
            ActivityEntry::new("lab.score").user(Some(teacher)),
        )
        .await
        .expect("score");
    let LabScoreOutcome::Scored { score, .. } = outcome else {
        panic!("expected scored, got {outcome:?}");
    };
    assert_eq!(score.auto_score, Some(10.0));
    assert_eq!(score.max_score, 10.0);
    assert_eq!(score.graded_by, Some(teacher));

    // 无提交时不写成绩也不写日志
    let nobody = common::create_user(&storage, "nobody", UserRole::Student).await;
    let outcome = storage
        .score_lab(
            lab.lab.id,
            ScoreLabRequest {
                student_id: nobody.id,
                submission_id: None,
            },
            actor,
            ActivityEntry::new("lab.score").user(Some(teacher)),
        )
        .await
        .expect("score");
    assert!(matches!(outcome, LabScoreOutcome::SubmissionNotFound));

    let logs = storage
        .list_activity_logs(log_filter("lab.score"))
        .await
        .expect("logs");
    assert_eq!(logs.pagination.total, 1);
}

#[actix_web::test]
async fn test_achievement_cannot_be_awarded_twice() {
    let storage = common::memory_storage().await;
    let student = common::create_user(&storage, "kanha", UserRole::Student).await;
    let achievement = storage
        .create_achievement(
            CreateAchievementRequest {
                name: "First experiment".to_string(),
                description: None,
                achievement_type: "milestone".to_string(),
                criteria: None,
                points: 10,
                badge_icon: None,
                badge_color: None,
            },
            None,
        )
        .await
        .expect("achievement");

    let award = || AwardAchievementRequest {
        student_id: student.id,
        achievement_id: achievement.id,
        simulation_id: None,
    };

    let first = storage
        .award_achievement(award(), ActivityEntry::new("achievement.award"))
        .await
        .expect("award");
    assert!(matches!(first, AwardOutcome::Awarded(_)));

    let second = storage
        .award_achievement(award(), ActivityEntry::new("achievement.award"))
        .await
        .expect("award");
    assert!(matches!(second, AwardOutcome::AlreadyAwarded));

    let earned = storage
        .list_student_achievements(student.id)
        .await
        .expect("earned");
    assert_eq!(earned.len(), 1);

    let logs = storage
        .list_activity_logs(log_filter("achievement.award"))
        .await
        .expect("logs");
    assert_eq!(logs.pagination.total, 1);
}

#[actix_web::test]
async fn test_autosave_then_submit_closes_session() {
    let storage = common::memory_storage().await;
    let (teacher, student, course) = enrolled_course(&storage, "PHY-S").await;
    let lab = storage
        .create_lab(lab_request(course, None), Some(teacher))
        .await
        .expect("lab");
    let session_id = started_session(&storage, lab.lab.id, student).await;

    let outcome = storage
        .autosave_lab(lab.lab.id, student, session_id, serde_json::json!({ "g": "9" }))
        .await
        .expect("autosave");
    let LabSubmitOutcome::Saved { submission, session } = outcome else {
        panic!("autosave should succeed, got {outcome:?}");
    };
    assert_eq!(submission.autosave_data, Some(serde_json::json!({ "g": "9" })));
    assert_eq!(submission.responses, None);
    assert_eq!(submission.submitted_at, None);
    assert_eq!(session.status, LabSessionStatus::InProgress);

    // 再次自动保存覆盖同一条提交
    let outcome = storage
        .autosave_lab(lab.lab.id, student, session_id, serde_json::json!({ "g": "9.7" }))
        .await
        .expect("autosave");
    let LabSubmitOutcome::Saved { submission: second, .. } = outcome else {
        panic!("autosave should succeed, got {outcome:?}");
    };
    assert_eq!(second.id, submission.id);
    assert_eq!(second.autosave_data, Some(serde_json::json!({ "g": "9.7" })));

    let outcome = storage
        .submit_lab(lab.lab.id, student, session_id, serde_json::json!({ "g": "9.8" }))
        .await
        .expect("submit");
    let LabSubmitOutcome::Saved { submission, session } = outcome else {
        panic!("submit should succeed, got {outcome:?}");
    };
    assert_eq!(submission.id, second.id);
    assert_eq!(submission.responses, Some(serde_json::json!({ "g": "9.8" })));
    assert!(submission.submitted_at.is_some());
    assert_eq!(session.status, LabSessionStatus::Submitted);
    assert!(session.is_ended());

    let outcome = storage
        .submit_lab(lab.lab.id, student, session_id, serde_json::json!({ "g": "1" }))
        .await
        .expect("resubmit");
    assert!(matches!(outcome, LabSubmitOutcome::NotInProgress(_)));
}

#[actix_web::test]
async fn test_autosave_and_submit_reject_foreign_session() {
    let storage = common::memory_storage().await;
    let (teacher, student, course) = enrolled_course(&storage, "PHY-F").await;
    let other = common::create_user(&storage, "PHY-F-other", UserRole::Student).await;
    let lab = storage
        .create_lab(lab_request(course, None), Some(teacher))
        .await
        .expect("lab");
    let session_id = started_session(&storage, lab.lab.id, student).await;

    let outcome = storage
        .autosave_lab(lab.lab.id, other.id, session_id, serde_json::json!({}))
        .await
        .expect("autosave");
    assert!(matches!(outcome, LabSubmitOutcome::SessionNotFound));

    let outcome = storage
        .submit_lab(lab.lab.id, student, session_id + 1000, serde_json::json!({}))
        .await
        .expect("submit");
    assert!(matches!(outcome, LabSubmitOutcome::SessionNotFound));
}

#[actix_web::test]
async fn test_annotation_rebuilds_breakdown() {
    let storage = common::memory_storage().await;
    let (teacher, student, course) = enrolled_course(&storage, "PHY-A").await;
    let (lab_id, criteria) = scored_lab(
        &storage,
        teacher,
        student,
        course,
        serde_json::json!({ "g": "9.81", "unit": "m/s" }),
    )
    .await;
    let (gravity, units) = (criteria[0], criteria[1]);

    let annotate = |criterion_id: i64, points: f64| AnnotateRequest {
        criterion_id,
        points_awarded: points,
        teacher_comment: Some("checked".to_string()),
        annotation_type: None,
    };

    let outcome = storage
        .annotate_score(lab_id, student, annotate(units, 4.0), teacher)
        .await
        .expect("annotate");
    let AnnotateOutcome::Annotated(score) = outcome else {
        panic!("annotation should succeed, got {outcome:?}");
    };
    assert_eq!(score.auto_score, Some(10.0));
    assert_eq!(score.manual_score, Some(14.0));
    assert_eq!(score.final_score, Some(14.0));
    assert_eq!(score.rubric_breakdown.len(), 2);
    let gravity_line = &score.rubric_breakdown[0];
    assert_eq!(gravity_line.criterion_id, gravity);
    assert_eq!(gravity_line.awarded_points, 10.0);
    assert_eq!(gravity_line.annotation_type, "auto");
    let units_line = &score.rubric_breakdown[1];
    assert_eq!(units_line.awarded_points, 4.0);
    assert_eq!(units_line.annotation_type, "manual");
    assert_eq!(units_line.teacher_comment.as_deref(), Some("checked"));

    // 同一标准再次批注覆盖原值
    let outcome = storage
        .annotate_score(lab_id, student, annotate(units, 5.0), teacher)
        .await
        .expect("annotate");
    let AnnotateOutcome::Annotated(score) = outcome else {
        panic!("annotation should succeed, got {outcome:?}");
    };
    assert_eq!(score.final_score, Some(15.0));
    let (_, annotations) = storage
        .get_lab_score(lab_id, student)
        .await
        .expect("score")
        .expect("score exists");
    assert_eq!(annotations.len(), 1);
}

#[actix_web::test]
async fn test_annotation_guards() {
    let storage = common::memory_storage().await;
    let (teacher, student, course) = enrolled_course(&storage, "PHY-G").await;
    let (lab_id, criteria) =
        scored_lab(&storage, teacher, student, course, serde_json::json!({ "g": "1" })).await;

    let annotate = |criterion_id: i64, points: f64| AnnotateRequest {
        criterion_id,
        points_awarded: points,
        teacher_comment: None,
        annotation_type: None,
    };

    let outcome = storage
        .annotate_score(lab_id, student, annotate(criteria[0], 10.5), teacher)
        .await
        .expect("annotate");
    assert!(matches!(outcome, AnnotateOutcome::OutOfRange { max_points } if max_points == 10.0));

    let outcome = storage
        .annotate_score(lab_id, student, annotate(criteria[1], -1.0), teacher)
        .await
        .expect("annotate");
    assert!(matches!(outcome, AnnotateOutcome::OutOfRange { max_points } if max_points == 5.0));

    let outcome = storage
        .annotate_score(lab_id, student, annotate(criteria[1] + 1000, 1.0), teacher)
        .await
        .expect("annotate");
    assert!(matches!(outcome, AnnotateOutcome::CriterionNotFound));

    let nobody = common::create_user(&storage, "PHY-G-nobody", UserRole::Student).await;
    let outcome = storage
        .annotate_score(lab_id, nobody.id, annotate(criteria[0], 1.0), teacher)
        .await
        .expect("annotate");
    assert!(matches!(outcome, AnnotateOutcome::ScoreNotFound));

    // 被拒绝的批注不改变成绩
    let (score, annotations) = storage
        .get_lab_score(lab_id, student)
        .await
        .expect("score")
        .expect("score exists");
    assert!(annotations.is_empty());
    assert_eq!(score.manual_score, None);
    assert_eq!(score.final_score, Some(0.0));
}

#[actix_web::test]
async fn test_manual_score_overrides_auto_score() {
    let storage = common::memory_storage().await;
    let (teacher, student, course) = enrolled_course(&storage, "PHY-M").await;
    let (lab_id, _) =
        scored_lab(&storage, teacher, student, course, serde_json::json!({ "g": "9.8" })).await;

    let score = storage
        .set_manual_score(
            lab_id,
            student,
            ManualScoreRequest {
                manual_score: Some(7.5),
                teacher_comments: Some("Show your working".to_string()),
            },
            teacher,
        )
        .await
        .expect("manual")
        .expect("score exists");
    assert_eq!(score.auto_score, Some(10.0));
    assert_eq!(score.manual_score, Some(7.5));
    assert_eq!(score.final_score, Some(7.5));
    assert_eq!(score.graded_by, Some(teacher));
    assert!(score.graded_at.is_some());

    // 未给出的字段保留原值
    let score = storage
        .set_manual_score(
            lab_id,
            student,
            ManualScoreRequest {
                manual_score: None,
                teacher_comments: None,
            },
            teacher,
        )
        .await
        .expect("manual")
        .expect("score exists");
    assert_eq!(score.manual_score, Some(7.5));
    assert_eq!(score.teacher_comments.as_deref(), Some("Show your working"));

    let nobody = common::create_user(&storage, "PHY-M-nobody", UserRole::Student).await;
    let missing = storage
        .set_manual_score(
            lab_id,
            nobody.id,
            ManualScoreRequest {
                manual_score: Some(1.0),
                teacher_comments: None,
            },
            teacher,
        )
        .await
        .expect("manual");
    assert!(missing.is_none());
}

#[actix_web::test]
async fn test_exercise_grading_commits_with_log() {
    let storage = common::memory_storage().await;
    let teacher = common::create_user(&storage, "ex-teacher", UserRole::Teacher).await;
    let student = common::create_user(&storage, "ex-student", UserRole::Student).await;
    let simulation = storage
        .create_simulation(
            CreateSimulationRequest {
                slug: "projectile-motion".to_string(),
                title: "Projectile motion".to_string(),
                description: None,
                subject: Some("physics".to_string()),
                grade_level: None,
                simulation_url: None,
                thumbnail_url: None,
                is_published: true,
                allow_guest: false,
            },
            Some(teacher.id),
        )
        .await
        .expect("simulation");

    let detail = |answer: &str, is_correct: bool, score: f64| AnswerDetail {
        answer: serde_json::json!(answer),
        is_correct,
        score,
        max_score: 5.0,
        feedback: None,
    };
    let submission = storage
        .insert_exercise_submission(NewExerciseSubmission {
            simulation_id: simulation.id,
            student_id: student.id,
            answers: serde_json::json!({ "1": "45", "2": "parabola" }),
            details: BTreeMap::from([
                ("1".to_string(), detail("45", true, 5.0)),
                ("2".to_string(), detail("parabola", false, 0.0)),
            ]),
            total_score: 5.0,
            max_score: 10.0,
        })
        .await
        .expect("submission");
    assert!(!submission.is_graded);

    let graded = |is_draft: bool| GradedSubmission {
        details: BTreeMap::from([
            ("1".to_string(), detail("45", true, 5.0)),
            ("2".to_string(), detail("parabola", true, 4.0)),
        ]),
        total_score: 9.0,
        teacher_feedback: Some("Good reasoning".to_string()),
        graded_by: teacher.id,
        is_draft,
    };
    let log = || {
        ActivityEntry::new("exercise.grade")
            .user(Some(teacher.id))
            .resource("exercise_submission", submission.id)
    };

    // 不存在的提交：不更新也不写日志
    let missing = storage
        .grade_exercise_submission(submission.id + 1000, graded(false), log())
        .await
        .expect("grade");
    assert!(missing.is_none());
    let logs = storage
        .list_activity_logs(log_filter("exercise.grade"))
        .await
        .expect("logs");
    assert_eq!(logs.pagination.total, 0);

    // 草稿保存分数但不标记已批改
    let draft = storage
        .grade_exercise_submission(submission.id, graded(true), log())
        .await
        .expect("grade")
        .expect("submission exists");
    assert!(!draft.is_graded);
    assert_eq!(draft.graded_at, None);
    assert_eq!(draft.total_score, 9.0);

    let final_grade = storage
        .grade_exercise_submission(submission.id, graded(false), log())
        .await
        .expect("grade")
        .expect("submission exists");
    assert!(final_grade.is_graded);
    assert!(final_grade.graded_at.is_some());
    assert_eq!(final_grade.graded_by, Some(teacher.id));
    assert_eq!(final_grade.teacher_feedback.as_deref(), Some("Good reasoning"));
    assert!(final_grade.details["2"].is_correct);

    let stored = storage
        .get_exercise_submission(submission.id)
        .await
        .expect("lookup")
        .expect("submission exists");
    assert_eq!(stored.total_score, 9.0);
    assert!(stored.is_graded);

    let logs = storage
        .list_activity_logs(log_filter("exercise.grade"))
        .await
        .expect("logs");
    assert_eq!(logs.pagination.total, 2);
    assert!(logs.items.iter().all(|entry| {
        entry.resource_id.as_deref() == Some(submission.id.to_string().as_str())
    }));
}
