use webclient_latency::error::AppResult;

fn main() -> AppResult<()> {
    webclient_latency::entry::run()
}
