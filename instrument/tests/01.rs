use instrument;

#[test]
fn test_generated_mountains_search() {
    for (size, peak) in [(10000, 5023), (100000, 50230), (1, 0), (2, 1)] {
        let heights = instrument::generate_mountain(size, peak);
        let res = peakfinder::find_max(&heights, 0, heights.len() - 1);
        assert_eq!(Ok(peak as i32), res);
    }
}

#[test]
fn test_capture_search_result() {
    let heights = instrument::generate_mountain(10000, 5023);
    let (mut search, captured) =
        instrument::capture(|| peakfinder::find_max(&heights, 0, heights.len() - 1));
    let elapsed = instrument::time_repeated(10, || {
        search().unwrap();
    });
    assert_eq!(Some(Ok(5023)), captured.last());

    let line = instrument::report_line(elapsed, "not threaded", heights.len(), 5023);
    assert!(line.starts_with("elapsed time = "));
    assert!(line.ends_with("not threaded array size=10000 ans=5023"));
}
