use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    cubostats::apps::run_convert_stats(std::env::args().skip(1))
}
