use std::rc::Rc;
use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hajj_course::catalog::catalog;
use hajj_course::course::{Course, SharedBackend};
use hajj_course::persistence::MemoryStore;
use hajj_course::runtime::{CourseEvent, FixedTicker, Runner, TestEventSource};
use hajj_course::sequencer::{Stage, TASK_DONE_PROGRESS, VIDEO_DONE_PROGRESS};

fn key(c: char) -> CourseEvent {
    CourseEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Drives a lesson through Runner/TestEventSource without a TTY: ticks play the
// video, digit keys toggle task steps or pick quiz answers.
#[test]
fn headless_lesson_flow_completes_module() {
    let backend: SharedBackend = Rc::new(MemoryStore::new());
    let mut course = Course::open(backend);
    let mut lesson = course.start_lesson("ihram");
    lesson.toggle_playback();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(1));

    let mut steps = 0;
    while lesson.stage() == Stage::Video && steps < 500 {
        if let CourseEvent::Tick = runner.step() {
            lesson.on_tick(&mut course.progress);
        }
        steps += 1;
    }
    assert_eq!(lesson.stage(), Stage::Task);
    assert_eq!(
        course.progress.module_progress("ihram").unwrap().progress,
        VIDEO_DONE_PROGRESS
    );

    for c in ['1', '2', '3', '4'] {
        tx.send(key(c)).unwrap();
    }
    let correct = catalog().questions("ihram")[0].correct_answer;
    tx.send(key(char::from_digit(correct as u32 + 1, 10).unwrap()))
        .unwrap();

    for _ in 0..50 {
        if let CourseEvent::Key(KeyEvent {
            code: KeyCode::Char(c),
            ..
        }) = runner.step()
        {
            let idx = c.to_digit(10).unwrap() as usize - 1;
            match lesson.stage() {
                Stage::Task => {
                    lesson.toggle_step(idx);
                    if lesson.finish_task(&mut course.progress) {
                        assert_eq!(
                            course.progress.module_progress("ihram").unwrap().progress,
                            TASK_DONE_PROGRESS
                        );
                    }
                }
                Stage::Quiz => {
                    lesson.select_answer(idx);
                    lesson.advance_quiz(&mut course.progress);
                }
                Stage::Video => unreachable!(),
            }
        }
        if lesson.is_finished() {
            break;
        }
    }

    assert_eq!(lesson.quiz_score(), Some(100));
    let ihram = course.progress.module_progress("ihram").unwrap();
    assert!(ihram.completed);
    assert_eq!(ihram.progress, 100);
    assert_eq!(course.progress.total_progress(), 14);
}

#[test]
fn abandoning_a_lesson_keeps_stage_progress() {
    let backend: SharedBackend = Rc::new(MemoryStore::new());
    let mut course = Course::open(backend);
    {
        let mut lesson = course.start_lesson("arafat");
        lesson.seek(100, &mut course.progress);
    }
    assert_eq!(
        course.progress.module_progress("arafat").unwrap().progress,
        VIDEO_DONE_PROGRESS
    );

    let lesson = course.start_lesson("arafat");
    assert_eq!(lesson.stage(), Stage::Video);
    assert_eq!(lesson.video().position(), 0);
}
