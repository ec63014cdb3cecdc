//! Integration tests for the record store: CSV in, blocks and index out.

use bplusdb::common::config::{BLOCKING_FACTOR, BLOCK_SIZE};
use bplusdb::storage::{Block, BlockHeader};
use bplusdb::{BlockId, IndexConfig, Record, RecordStore, SlotId};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn employees(count: usize) -> String {
    let mut csv = String::from("NAME,SSN,DEPARTMENTCODE,ADDRESS,PHONE,BIRTHDATE,SEX,JOBCODE,SALARY\n");
    for i in 0..count {
        // SSNs out of order so the index does real work.
        let ssn = 100_000_000 + (i * 7919) % 1_000;
        csv.push_str(&format!(
            "Employee {i},{ssn},D{d},\"{i} Main St, Town\",555{i:04},19900101,M,J{d},{s}\n",
            d = i % 3,
            s = 1000 + i
        ));
    }
    csv
}

#[test]
fn test_load_insert_all_and_find() {
    init_logging();
    let mut store = RecordStore::new(IndexConfig::default()).unwrap();
    let loaded = store.load_csv(&employees(30)).unwrap();
    assert_eq!(loaded, 30);

    for i in 0..loaded {
        store.insert_record(i).unwrap();
    }

    assert_eq!(store.blocks().len(), 30usize.div_ceil(BLOCKING_FACTOR));
    assert_eq!(store.tree().len(), 30);
    store.tree().check_invariants().unwrap();

    for record in store.records() {
        let found = store.find_by_ssn(record.ssn.as_str()).unwrap().unwrap();
        assert_eq!(found.name, record.name);
        assert_eq!(found.address, record.address);
    }
}

#[test]
fn test_delete_half_keeps_index_consistent() {
    init_logging();
    let mut store = RecordStore::new(IndexConfig::new(4, 3).unwrap()).unwrap();
    store.load_csv(&employees(24)).unwrap();
    for i in 0..24 {
        store.insert_record(i).unwrap();
    }

    for line in (1..=24).step_by(2) {
        let deleted = store.delete_record(line).unwrap().unwrap();
        assert_eq!(deleted.locator.line_number, Some(line));
        store.tree().check_invariants().unwrap();
    }

    assert_eq!(store.tree().len(), 12);
    for record in store.records() {
        let live = record.line_number.unwrap() % 2 == 0;
        let found = store.find_by_ssn(record.ssn.as_str()).unwrap();
        assert_eq!(found.is_some(), live, "line {:?}", record.line_number);
    }

    // Deleted records keep their slots.
    let slots: usize = store.blocks().iter().map(Block::len).sum();
    assert_eq!(slots, 24);
}

#[test]
fn test_block_images_carry_valid_checksums() {
    let mut store = RecordStore::default();
    store.load_csv(&employees(6)).unwrap();
    for i in 0..6 {
        store.insert_record(i).unwrap();
    }
    store.delete_record(3).unwrap();

    for block in store.blocks() {
        let image = block.to_bytes();
        assert_eq!(image.len(), BLOCK_SIZE);
        assert!(Block::verify_checksum(&image));

        let header = BlockHeader::from_bytes(&image);
        assert_eq!(header.block_id, block.id());
        assert_eq!(header.record_count as usize, block.len());
    }

    let image = store.blocks()[0].to_bytes();
    let third = Record::from_bytes(
        &image[BlockHeader::SIZE + 2 * bplusdb::RECORD_SIZE..BlockHeader::SIZE + 3 * bplusdb::RECORD_SIZE],
    )
    .unwrap();
    assert!(third.deleted);
}

#[test]
fn test_locator_points_at_slot() {
    let mut store = RecordStore::default();
    store.load_csv(&employees(5)).unwrap();
    let mut last = None;
    for i in 0..5 {
        last = Some(store.insert_record(i).unwrap());
    }

    let locator = last.unwrap();
    assert_eq!(locator.block_id, BlockId::new(1));
    assert_eq!(locator.slot, SlotId::new(0));
    let json = serde_json::to_value(locator).unwrap();
    assert_eq!(json["block_id"], 1);
    assert_eq!(json["line_number"], 5);
}

/// Two rows sharing an SSN: deleting the copy the index does not point at
/// must leave the indexed copy reachable.
#[test]
fn test_delete_duplicate_ssn_keeps_indexed_copy() {
    init_logging();
    let mut store = RecordStore::default();
    store.load_csv("NAME,SSN\nAlice,111\nAliceDup,111\n").unwrap();
    store.insert_record(0).unwrap();
    store.insert_record(1).unwrap();

    let deleted = store.delete_record(1).unwrap().unwrap();
    assert_eq!(deleted.locator.slot, SlotId::new(0));
    assert_eq!(deleted.locator.line_number, Some(1));
    assert_eq!(store.find_by_ssn(111).unwrap().unwrap().name, "AliceDup");

    store.delete_record(2).unwrap().unwrap();
    assert!(store.find_by_ssn(111).unwrap().is_none());
    assert!(store.tree().is_empty());
}

/// Deleting the indexed copy repoints the index at the remaining live copy.
#[test]
fn test_delete_indexed_copy_repoints_to_survivor() {
    let mut store = RecordStore::default();
    store.load_csv("NAME,SSN\nAlice,111\nAliceDup,111\n").unwrap();
    store.insert_record(0).unwrap();
    store.insert_record(1).unwrap();

    let deleted = store.delete_record(2).unwrap().unwrap();
    assert_eq!(deleted.locator.slot, SlotId::new(1));

    let locator = store.tree().search(111).unwrap().copied().unwrap();
    assert_eq!(locator.slot, SlotId::new(0));
    assert_eq!(store.find_by_ssn(111).unwrap().unwrap().name, "Alice");
    store.tree().check_invariants().unwrap();
}

/// Re-inserting the same record stores a second copy; deleting by line
/// removes copies one at a time.
#[test]
fn test_reinserted_record_deleted_copy_by_copy() {
    let mut store = RecordStore::default();
    store.load_csv("NAME,SSN\nBob,222\n").unwrap();
    store.insert_record(0).unwrap();
    store.insert_record(0).unwrap();

    store.delete_record(1).unwrap().unwrap();
    assert_eq!(store.find_by_ssn(222).unwrap().unwrap().name, "Bob");

    store.delete_record(1).unwrap().unwrap();
    assert!(store.find_by_ssn(222).unwrap().is_none());
    assert!(store.delete_record(1).unwrap().is_none());
}
