pub async fn index() -> &'static str {
    "API is running. Use POST /extract-abstract or POST /forminator-webhook; \
     POST /report renders a report, GET /admin shows upload activity.\n"
}
