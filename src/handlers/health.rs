/// Liveness probe.
pub async fn alive() -> &'static str {
    "Wellness Platform API is alive!"
}
