//! The `classpulse init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let files = [
        ("roster.csv", SAMPLE_ROSTER),
        ("submissions.csv", SAMPLE_SUBMISSIONS),
        ("catalog.toml", SAMPLE_CATALOG),
    ];

    for (name, content) in files {
        if std::path::Path::new(name).exists() {
            println!("{name} already exists, skipping.");
        } else {
            std::fs::write(name, content)?;
            println!("Created {name}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Replace roster.csv with your student roster");
    println!("  2. Run: classpulse validate --roster roster.csv --catalog catalog.toml");
    println!("  3. Run: classpulse run --roster roster.csv --submissions submissions.csv --catalog catalog.toml");

    Ok(())
}

const SAMPLE_ROSTER: &str = "\
roll,name,department
71812301231,Asha Iyer,CSE
71812301232,Ben Thomas,CSE
71812301233,Cara Nair,ECE
";

const SAMPLE_SUBMISSIONS: &str = "\
roll,course_code,staff,q1,q2,q3,q4,q5,q6,q7,q8,q9,q10,q11,q12,q13,q14,q15
71812301231,CSE101,Staff A,4,4,5,4,3,4,5,4,4,4,3,4,5,4,4
71812301232,MTH102,Staff C,3,3,4,3,3,3,4,3,3,3,3,4,3,3,3
";

const SAMPLE_CATALOG: &str = r#"# classpulse course catalog

[[courses]]
code = "CSE101"
title = "Introduction to Computer Science"
staff = ["Staff A", "Staff B"]

[[courses]]
code = "MTH102"
title = "Calculus II"
staff = ["Staff C", "Staff D"]
"#;
