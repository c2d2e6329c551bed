use mysqldump_to_tsv::{convert, Error, Stats};

const DUMP: &str = r#"-- MySQL dump 10.13
/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
DROP TABLE IF EXISTS `page`;
CREATE TABLE `page` (
  `page_id` int(8) unsigned NOT NULL AUTO_INCREMENT,
  `page_title` varbinary(255) NOT NULL DEFAULT ''
) ENGINE=InnoDB DEFAULT CHARSET=binary;
LOCK TABLES `page` WRITE;
INSERT INTO `page` VALUES (1,'Main_Page'),(2,'Smile_:)'),(3,'O\'Brien (disambiguation)'),(4,'C:\\'),(5,NULL);
INSERT INTO `page` VALUES (6,'tab\there'),(7,'say \"hi\"'),(8,'a,b');
UNLOCK TABLES;
INSERT INTO `redirect` VALUES (605368,1,'разблюто','','Discussion from Stephen G. Brown\'s talk-page');
"#;

const EXPECTED: &str = "INSERT INTO `page` VALUES
1\tMain_Page
2\tSmile_:)
3\tO'Brien (disambiguation)
4\tC:\\
5\tNULL
INSERT INTO `page` VALUES
6\ttabthere
7\t\"say \"\"hi\"\"\"
8\ta,b
INSERT INTO `redirect` VALUES
605368\t1\tразблюто\t\tDiscussion from Stephen G. Brown's talk-page
";

fn run(dump: &str) -> Result<(String, Stats), Error> {
    let mut output = Vec::new();
    let stats = convert(dump.as_bytes(), &mut output)?;
    Ok((String::from_utf8(output).unwrap(), stats))
}

#[test]
fn test_end_to_end() {
    let (output, stats) =
        run("INSERT INTO `t` VALUES (1,'a'),(2,'b\\'s'),(3,NULL);\n").unwrap();
    assert_eq!(output, "INSERT INTO `t` VALUES\n1\ta\n2\tb's\n3\tNULL\n");
    assert_eq!(stats, Stats { statements: 1, rows: 3 });
}

#[test]
fn test_dump() {
    let (output, stats) = run(DUMP).unwrap();
    assert_eq!(output, EXPECTED);
    assert_eq!(stats, Stats { statements: 3, rows: 9 });
}

#[test]
fn test_idempotent() {
    assert_eq!(run(DUMP).unwrap(), run(DUMP).unwrap());
}

#[test]
fn test_missing_final_newline_and_semicolon() {
    let (output, _) = run("INSERT INTO `t` VALUES (1),(2)").unwrap();
    assert_eq!(output, "INSERT INTO `t` VALUES\n1\n2\n");
}

#[test]
fn test_earlier_statements_survive_errors() {
    let mut output = Vec::new();
    let dump = "INSERT INTO `a` VALUES (1,'x');\nINSERT INTO `b` VALUES (1,'unterminated\n";
    match convert(dump.as_bytes(), &mut output) {
        Err(Error::Line { number: 2, source }) => {
            assert!(matches!(*source, Error::MalformedTuple { .. }))
        }
        other => panic!("expected malformed tuple on line 2, got {:?}", other),
    }
    assert_eq!(output, b"INSERT INTO `a` VALUES\n1\tx\n");
}

#[test]
fn test_unrecognized_insert() {
    let err = run("INSERT INTO t VALUES (1);\n").unwrap_err();
    match err {
        Error::Line { number: 1, source } => {
            assert!(matches!(*source, Error::UnrecognizedStatementShape { .. }))
        }
        other => panic!("unexpected error {:?}", other),
    }
}
