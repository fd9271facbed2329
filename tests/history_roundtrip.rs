use customizer_canvas::history::History;

#[test]
fn undo_redo_roundtrip() {
    let mut history: History<i32> = History::new();
    history.set_and_commit(|_| 0);
    history.set_and_commit(|prev| prev.copied().unwrap() + 50);

    assert!(history.can_undo());
    assert!(!history.can_redo());

    assert_eq!(history.undo(), Some(&0));
    assert!(history.can_redo());
    assert_eq!(history.redo(), Some(&50));
    assert!(!history.can_redo());
}

#[test]
fn undo_at_boundary_returns_none() {
    let mut history: History<i32> = History::new();
    assert_eq!(history.undo(), None);
    assert_eq!(history.redo(), None);

    history.set_and_commit(|_| 1);
    assert!(!history.can_undo());
    assert_eq!(history.undo(), None);
    assert_eq!(history.current(), Some(&1));
}

#[test]
fn commit_after_undo_truncates_redo_tail() {
    let mut history: History<i32> = History::new();
    history.set_and_commit(|_| 1);
    history.set_and_commit(|_| 2);
    history.set_and_commit(|_| 3);

    history.undo();
    history.undo();
    assert_eq!(history.current(), Some(&1));

    history.set_and_commit(|_| 99);
    assert!(!history.can_redo());
    assert_eq!(history.len(), 2);
    assert_eq!(history.current(), Some(&99));
    assert_eq!(history.undo(), Some(&1));
}

#[test]
fn set_and_commit_sees_current_state() {
    let mut history: History<Vec<i32>> = History::new();
    history.set_and_commit(|_| vec![1]);
    history.set_and_commit(|prev| {
        let mut next = prev.cloned().unwrap_or_default();
        next.push(2);
        next
    });
    assert_eq!(history.current(), Some(&vec![1, 2]));
}
