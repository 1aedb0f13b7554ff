use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    cubostats::apps::run_fetch_reference(std::env::args().skip(1))
}
