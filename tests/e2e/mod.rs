// End-to-end tests for the Panda Tutor HTTP API
//
// Each test starts the full router on an ephemeral port with a scripted mock
// speech provider and a throwaway mistake notebook, then drives it over HTTP.

mod test_audio;
mod test_explain;
mod test_health;
mod test_lessons;
mod test_quiz;
