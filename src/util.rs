/// Time-of-day flavour for the goodbye line.
pub fn part_of_day(hour: u32) -> &'static str {
    match hour {
        5..=11 => "morning ahead",
        12..=17 => "afternoon ahead",
        18..=22 => "evening ahead",
        _ => "night",
    }
}
