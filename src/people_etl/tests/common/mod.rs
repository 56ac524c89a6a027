#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use people_etl::config::PipelineConfig;
use tempfile::TempDir;

pub const CONS: &str = "\
cons_id,source,subsource,create_dt,modified_dt
1,web,,\"Thu, 2020-03-05 10:00:00\",\"Fri, 2020-01-10 09:00:00\"
2,fair,,\"Mon, 2019-07-01 08:00:00\",\"Tue, 2019-07-02 08:00:00\"
3,fair,,\"Wed, 2018-05-02 12:00:00\",\"Wed, 2018-05-02 12:00:00\"
4,web,,\"Thu, 2019-07-04 10:00:00\",\"Fri, 2019-07-05 10:00:00\"
5,import,,\"Sun, 2021-07-04 11:00:00\",\"Mon, 2021-07-05 11:00:00\"
6,web,,\"Tue, 2017-11-21 09:15:00\",\"Mon, 2017-11-20 09:15:00\"
7,web,,\"Fri, 2016-01-01 00:00:00\",\"Fri, 2016-01-01 00:00:00\"
";

pub const CONS_EMAIL: &str = "\
cons_email_id,cons_id,is_primary,email,create_dt,modified_dt
10,1,1,p1@example.org,\"Thu, 2020-03-05 10:00:00\",\"Thu, 2020-03-05 10:00:00\"
20,2,1,p2@example.org,\"Mon, 2019-07-01 08:00:00\",\"Mon, 2019-07-01 08:00:00\"
30,3,1,p3@example.org,\"Wed, 2018-05-02 12:00:00\",\"Wed, 2018-05-02 12:00:00\"
40,4,1,p4@example.org,\"Thu, 2019-07-04 10:00:00\",\"Thu, 2019-07-04 10:00:00\"
50,5,1,p5@example.org,\"Sun, 2021-07-04 11:00:00\",\"Sun, 2021-07-04 11:00:00\"
60,6,1,p6a@example.org,\"Tue, 2017-11-21 09:15:00\",\"Tue, 2017-11-21 09:15:00\"
61,6,1,p6b@example.org,\"Tue, 2017-11-21 09:15:00\",\"Tue, 2017-11-21 09:15:00\"
70,7,0,p7@example.org,\"Fri, 2016-01-01 00:00:00\",\"Fri, 2016-01-01 00:00:00\"
";

pub const CHAPTER: &str = "\
cons_email_id,chapter_id,isunsub,unsub_dt,modified_dt
20,2,1,\"Mon, 2019-07-01 08:00:00\",\"Mon, 2019-07-01 08:00:00\"
30,1,1,\"Wed, 2018-05-02 12:00:00\",\"Wed, 2018-05-02 12:00:00\"
40,1,0,\"Thu, 2019-07-04 10:00:00\",\"Thu, 2019-07-04 10:00:00\"
";

pub struct Workspace {
    pub dir: TempDir, // keep alive for the life of the test
    pub cfg: PipelineConfig,
}

impl Workspace {
    pub fn input(&self, name: &str) -> PathBuf {
        self.dir.path().join("in").join(name)
    }

    pub fn read_output(&self, path: PathBuf) -> String {
        fs::read_to_string(path).expect("read output")
    }
}

/// Fixture extracts in `<tmp>/in`, outputs configured for `<tmp>/out`.
pub fn setup_workspace(cons: &str, cons_email: &str, chapter: &str) -> Workspace {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("cons.csv"), cons).unwrap();
    fs::write(input.join("cons_email.csv"), cons_email).unwrap();
    fs::write(input.join("chapter.csv"), chapter).unwrap();

    let mut cfg = PipelineConfig::default();
    cfg.inputs.dir = input;
    cfg.outputs.dir = dir.path().join("out");
    Workspace { dir, cfg }
}

pub fn reference_workspace() -> Workspace {
    setup_workspace(CONS, CONS_EMAIL, CHAPTER)
}
