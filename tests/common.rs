#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Ohio has the gaps +5, +3, +7 and +1 between Biden and Trump, Iowa a single -4 poll and the
/// rows without a state file two national polls with +2 and +4. The last row is malformed.
pub const SAMPLE_FEED: &str = "\
question_id,poll_id,state,pollster,fte_grade,sample_size,population,cycle,start_date,end_date,candidate_name,pct
101,1,Ohio,Pollster A,A+,800,lv,2020,9/1/20,9/3/20,Joe Biden,50
101,1,Ohio,Pollster A,A+,800,lv,2020,9/1/20,9/3/20,Donald Trump,45
101,1,Ohio,Pollster A,A+,800,lv,2020,9/1/20,9/3/20,Jo Jorgensen,2
102,2,Ohio,Pollster B,B,650,rv,2020,9/10/20,9/12/20,Joe Biden,48
102,2,Ohio,Pollster B,B,650,rv,2020,9/10/20,9/12/20,Donald Trump,45
103,3,Ohio,Pollster C,A-,1200,lv,2020,9/20/20,9/24/20,Joe Biden,51
103,3,Ohio,Pollster C,A-,1200,lv,2020,9/20/20,9/24/20,Donald Trump,44
104,4,Ohio,Pollster D,C,400,a,2020,10/1/20,10/2/20,Joe Biden,46
104,4,Ohio,Pollster D,C,400,a,2020,10/1/20,10/2/20,Donald Trump,45
201,5,Iowa,Pollster A,A+,700,lv,2020,9/5/20,9/8/20,Joe Biden,44
201,5,Iowa,Pollster A,A+,700,lv,2020,9/5/20,9/8/20,Donald Trump,48
301,6,,Pollster E,B+,1500,lv,2020,9/2/20,9/6/20,Joe Biden,49
301,6,,Pollster E,B+,1500,lv,2020,9/2/20,9/6/20,Donald Trump,47
302,7,,Pollster F,A,2000,rv,2020,9/15/20,9/18/20,Joe Biden,50
302,7,,Pollster F,A,2000,rv,2020,9/15/20,9/18/20,Donald Trump,46
303,8,Texas,Pollster G,B,900,lv,2020,someday,9/18/20,Joe Biden,47
";

pub fn init_logger() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.try_init();
}

/// Write [`SAMPLE_FEED`] into `dir` and return its path.
pub fn write_sample_feed(dir: &Path) -> PathBuf {
	let path = dir.join("polls.csv");
	std::fs::write(&path, SAMPLE_FEED).expect("temporary directory is writable; qed");
	path
}
