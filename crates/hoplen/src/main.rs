#![forbid(unsafe_code)]

fn main() -> anyhow::Result<()> {
    hoplen_report::hoplen()
}
