use anyhow::{bail, Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Journal operation types
///
/// Free-form string fields (rfid, pin, name, location) are hex-encoded on
/// disk so they can never collide with the field delimiter.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalOp {
    CreateUser {
        id: u64,
        rfid: String,
        pin: String,
        name: String,
    },
    SeedLocker {
        id: u64,
        display_number: u32,
        location: String,
    },
    Occupy {
        locker_id: u64,
        user_id: u64,
    },
    Vacate {
        locker_id: u64,
    },
}

impl JournalOp {
    fn to_line(&self) -> String {
        match self {
            JournalOp::CreateUser { id, rfid, pin, name } => {
                format!(
                    "CREATE_USER|{}|{}|{}|{}",
                    id,
                    hex::encode(rfid),
                    hex::encode(pin),
                    hex::encode(name)
                )
            }
            JournalOp::SeedLocker {
                id,
                display_number,
                location,
            } => {
                format!("SEED_LOCKER|{}|{}|{}", id, display_number, hex::encode(location))
            }
            JournalOp::Occupy { locker_id, user_id } => {
                format!("OCCUPY|{}|{}", locker_id, user_id)
            }
            JournalOp::Vacate { locker_id } => {
                format!("VACATE|{}", locker_id)
            }
        }
    }

    fn from_line(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('|').collect();

        match parts.first() {
            Some(&"CREATE_USER") => {
                if parts.len() != 5 {
                    bail!("Invalid CREATE_USER format");
                }
                let id = parts[1].parse::<u64>().context("Invalid user ID")?;
                let rfid = decode_field(parts[2]).context("Invalid rfid field")?;
                let pin = decode_field(parts[3]).context("Invalid pin field")?;
                let name = decode_field(parts[4]).context("Invalid name field")?;

                Ok(JournalOp::CreateUser { id, rfid, pin, name })
            }
            Some(&"SEED_LOCKER") => {
                if parts.len() != 4 {
                    bail!("Invalid SEED_LOCKER format");
                }
                let id = parts[1].parse::<u64>().context("Invalid locker ID")?;
                let display_number = parts[2]
                    .parse::<u32>()
                    .context("Invalid display number")?;
                let location = decode_field(parts[3]).context("Invalid location field")?;

                Ok(JournalOp::SeedLocker {
                    id,
                    display_number,
                    location,
                })
            }
            Some(&"OCCUPY") => {
                if parts.len() != 3 {
                    bail!("Invalid OCCUPY format");
                }
                let locker_id = parts[1].parse::<u64>().context("Invalid locker ID")?;
                let user_id = parts[2].parse::<u64>().context("Invalid user ID")?;

                Ok(JournalOp::Occupy { locker_id, user_id })
            }
            Some(&"VACATE") => {
                if parts.len() != 2 {
                    bail!("Invalid VACATE format");
                }
                let locker_id = parts[1].parse::<u64>().context("Invalid locker ID")?;

                Ok(JournalOp::Vacate { locker_id })
            }
            _ => bail!("Unknown operation type"),
        }
    }
}

fn decode_field(field: &str) -> Result<String> {
    let bytes = hex::decode(field).context("Invalid hex")?;
    String::from_utf8(bytes).context("Invalid UTF-8")
}

/// Append-only operation log backing the locker store.
///
/// Replayed at startup to restore users and locker occupancy.
pub struct Journal {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl Journal {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open journal file")?;

        Ok(Journal {
            file: Arc::new(Mutex::new(file)),
            path,
        })
    }

    pub fn append(&self, op: JournalOp) -> Result<()> {
        let line = op.to_line();
        let mut file = self.file.lock().unwrap();
        writeln!(file, "{}", line).context("Failed to write to journal")?;
        file.flush().context("Failed to flush journal")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<JournalOp>> {
        let file = File::open(&self.path).context("Failed to open journal for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from journal")?;
            let line = line.trim();

            // Skip empty lines
            if line.is_empty() {
                continue;
            }

            match JournalOp::from_line(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse journal line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }

    pub fn truncate(&self) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        file.set_len(0).context("Failed to truncate journal")?;
        file.flush().context("Failed to flush journal after truncate")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_journal_op_serialization() {
        // Test CreateUser
        let op = JournalOp::CreateUser {
            id: 1,
            rfid: "12345".to_string(),
            pin: "1234".to_string(),
            name: "Demo User".to_string(),
        };
        let serialized = op.to_line();
        assert_eq!(
            serialized,
            format!(
                "CREATE_USER|1|{}|{}|{}",
                hex::encode("12345"),
                hex::encode("1234"),
                hex::encode("Demo User")
            )
        );
        let deserialized = JournalOp::from_line(&serialized).unwrap();
        assert_eq!(op, deserialized);

        // Test SeedLocker
        let op = JournalOp::SeedLocker {
            id: 11,
            display_number: 11,
            location: "Row 2, Col 1".to_string(),
        };
        let serialized = op.to_line();
        assert_eq!(
            serialized,
            format!("SEED_LOCKER|11|11|{}", hex::encode("Row 2, Col 1"))
        );
        let deserialized = JournalOp::from_line(&serialized).unwrap();
        assert_eq!(op, deserialized);

        // Test Occupy
        let op = JournalOp::Occupy {
            locker_id: 7,
            user_id: 2,
        };
        let serialized = op.to_line();
        assert_eq!(serialized, "OCCUPY|7|2");
        let deserialized = JournalOp::from_line(&serialized).unwrap();
        assert_eq!(op, deserialized);

        // Test Vacate
        let op = JournalOp::Vacate { locker_id: 7 };
        let serialized = op.to_line();
        assert_eq!(serialized, "VACATE|7");
        let deserialized = JournalOp::from_line(&serialized).unwrap();
        assert_eq!(op, deserialized);
    }

    #[test]
    fn test_delimiter_in_string_fields_round_trips() {
        let op = JournalOp::CreateUser {
            id: 3,
            rfid: "a|b|c".to_string(),
            pin: "0|0".to_string(),
            name: "Pipe | Fan".to_string(),
        };

        let deserialized = JournalOp::from_line(&op.to_line()).unwrap();
        assert_eq!(op, deserialized);
    }

    #[test]
    fn test_journal_append_and_replay() {
        let temp_dir = TempDir::new().unwrap();
        let journal_path = temp_dir.path().join("test.journal");

        let journal = Journal::new(journal_path.clone()).unwrap();

        journal
            .append(JournalOp::CreateUser {
                id: 1,
                rfid: "12345".to_string(),
                pin: "1234".to_string(),
                name: "Demo User".to_string(),
            })
            .unwrap();

        journal
            .append(JournalOp::SeedLocker {
                id: 7,
                display_number: 7,
                location: "Row 1, Col 7".to_string(),
            })
            .unwrap();

        journal
            .append(JournalOp::Occupy {
                locker_id: 7,
                user_id: 1,
            })
            .unwrap();

        journal.append(JournalOp::Vacate { locker_id: 7 }).unwrap();

        let operations = journal.replay().unwrap();
        assert_eq!(operations.len(), 4);

        match &operations[0] {
            JournalOp::CreateUser { id, rfid, pin, name } => {
                assert_eq!(*id, 1);
                assert_eq!(rfid, "12345");
                assert_eq!(pin, "1234");
                assert_eq!(name, "Demo User");
            }
            _ => panic!("Expected CreateUser"),
        }

        match &operations[1] {
            JournalOp::SeedLocker {
                id,
                display_number,
                location,
            } => {
                assert_eq!(*id, 7);
                assert_eq!(*display_number, 7);
                assert_eq!(location, "Row 1, Col 7");
            }
            _ => panic!("Expected SeedLocker"),
        }

        match &operations[2] {
            JournalOp::Occupy { locker_id, user_id } => {
                assert_eq!(*locker_id, 7);
                assert_eq!(*user_id, 1);
            }
            _ => panic!("Expected Occupy"),
        }

        match &operations[3] {
            JournalOp::Vacate { locker_id } => {
                assert_eq!(*locker_id, 7);
            }
            _ => panic!("Expected Vacate"),
        }
    }

    #[test]
    fn test_journal_truncate() {
        let temp_dir = TempDir::new().unwrap();
        let journal_path = temp_dir.path().join("test.journal");

        let journal = Journal::new(journal_path).unwrap();

        journal
            .append(JournalOp::Occupy {
                locker_id: 1,
                user_id: 1,
            })
            .unwrap();

        let operations = journal.replay().unwrap();
        assert_eq!(operations.len(), 1);

        journal.truncate().unwrap();

        let operations = journal.replay().unwrap();
        assert_eq!(operations.len(), 0);
    }

    #[test]
    fn test_journal_invalid_lines() {
        let temp_dir = TempDir::new().unwrap();
        let journal_path = temp_dir.path().join("test.journal");

        // Write invalid data directly to file
        fs::write(&journal_path, "INVALID_OP|data\nOCCUPY|7|2\n").unwrap();

        let journal = Journal::new(journal_path).unwrap();
        let operations = journal.replay().unwrap();

        // Should skip invalid line and parse valid one
        assert_eq!(operations.len(), 1);
        assert_eq!(
            operations[0],
            JournalOp::Occupy {
                locker_id: 7,
                user_id: 2
            }
        );
    }
}
