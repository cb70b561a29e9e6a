use truthguard_core::{
    update, Effect, InputMode, LoadingKind, Msg, Notification, SubmissionState,
    OCR_FAILED_MESSAGE,
};

fn init_logging() {
    guard_logging::initialize_for_tests();
}

fn select_image(state: SubmissionState) -> (SubmissionState, Vec<Effect>) {
    let (state, _) = update(state, Msg::ModeSelected(InputMode::Image));
    update(
        state,
        Msg::ImageSelected {
            file_name: "clipping.png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        },
    )
}

#[test]
fn image_upload_clears_text_and_starts_extraction() {
    init_logging();
    let (state, _) = update(SubmissionState::new(), Msg::TextChanged("old".to_string()));
    let (state, effects) = select_image(state);

    assert_eq!(state.text(), "");
    assert_eq!(state.loading(), LoadingKind::Extracting);
    assert!(state.view().is_loading());
    assert_eq!(state.view().busy_banner(), None);
    assert_eq!(
        effects,
        vec![Effect::ExtractText {
            request_id: 1,
            file_name: "clipping.png".to_string(),
            image: vec![0x89, b'P', b'N', b'G'],
        }]
    );
}

#[test]
fn progress_updates_are_title_cased_and_clamped() {
    init_logging();
    let (state, _) = select_image(SubmissionState::new());
    let (state, _) = update(
        state,
        Msg::OcrProgress {
            request_id: 1,
            status: "recognizing text".to_string(),
            progress: 0.25,
        },
    );
    let ocr = state.view().ocr.expect("ocr status");
    assert_eq!(ocr.label, "Recognizing Text");
    assert_eq!(ocr.percent(), 25);

    let (state, _) = update(
        state,
        Msg::OcrProgress {
            request_id: 1,
            status: "recognizing text".to_string(),
            progress: 3.0,
        },
    );
    assert_eq!(state.view().ocr.expect("ocr status").progress, 1.0);
}

#[test]
fn extracted_text_fills_the_text_box() {
    init_logging();
    let (state, _) = select_image(SubmissionState::new());
    let (mut state, effects) = update(
        state,
        Msg::OcrFinished {
            request_id: 1,
            result: Ok("Scanned headline".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.text(), "Scanned headline");
    assert_eq!(state.loading(), LoadingKind::None);
    assert!(state.view().ocr.is_none());
    assert!(state.view().detect_enabled);
    assert!(state.consume_dirty());

    let (_, effects) = update(state, Msg::DetectClicked);
    assert_eq!(
        effects,
        vec![Effect::Predict {
            request_id: 2,
            text: "Scanned headline".to_string(),
        }]
    );
}

#[test]
fn ocr_failure_notifies_and_returns_idle() {
    init_logging();
    let (state, _) = select_image(SubmissionState::new());
    let (state, _) = update(
        state,
        Msg::OcrProgress {
            request_id: 1,
            status: "loading image".to_string(),
            progress: 0.0,
        },
    );
    let (state, effects) = update(
        state,
        Msg::OcrFinished {
            request_id: 1,
            result: Err("unsupported image".to_string()),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::error(OCR_FAILED_MESSAGE))]
    );
    assert_eq!(state.loading(), LoadingKind::None);
    assert!(state.view().ocr.is_none());
    assert_eq!(state.text(), "");
}

#[test]
fn upload_ignored_while_loading() {
    init_logging();
    let (state, _) = select_image(SubmissionState::new());
    let (state, effects) = update(
        state,
        Msg::ImageSelected {
            file_name: "second.jpg".to_string(),
            bytes: vec![0xFF, 0xD8],
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.active_request(), Some(1));
}

#[test]
fn progress_for_other_request_is_ignored() {
    init_logging();
    let (state, _) = select_image(SubmissionState::new());
    let (state, _) = update(
        state,
        Msg::OcrProgress {
            request_id: 9,
            status: "recognizing text".to_string(),
            progress: 0.5,
        },
    );

    assert!(state.view().ocr.is_none());
}
