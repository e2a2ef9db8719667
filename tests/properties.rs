//! Property tests: chunking, worker count and merge order never change the
//! result.

use ironbrc::testing::naive_report;
use ironbrc::{process_chunk, AggregateTable, ExecMode, RunConfig, Runner, Tenths};
use proptest::prelude::*;

fn record() -> impl Strategy<Value = (String, i64)> {
    ("[A-Za-z][A-Za-z .'-]{0,11}", -9999i64..=9999)
}

fn render_input(records: &[(String, i64)], trailing_newline: bool) -> String {
    let mut s: String = records
        .iter()
        .map(|(k, v)| format!("{k};{}\n", Tenths(*v)))
        .collect();
    if !trailing_newline {
        s.pop();
    }
    s
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn streaming_matches_naive_for_any_chunking(
        records in proptest::collection::vec(record(), 0..200),
        block in 1usize..256,
        workers in 1usize..6,
        trailing_newline in any::<bool>(),
    ) {
        let input = render_input(&records, trailing_newline);
        let runner = Runner::new(
            ExecMode::Streaming,
            RunConfig::default().with_workers(workers).with_block_size(block),
        );
        let summary = runner.run(input.as_bytes()).unwrap();
        prop_assert_eq!(summary.report(), naive_report(&input));
        prop_assert_eq!(summary.stats.records, records.len() as u64);
    }

    #[test]
    fn modes_agree(
        records in proptest::collection::vec(record(), 0..200),
        workers in 1usize..6,
    ) {
        let input = render_input(&records, true);
        let cfg = RunConfig::default().with_workers(workers).with_block_size(97);
        let seq = Runner::new(ExecMode::Sequential, cfg.clone()).run(input.as_bytes()).unwrap();
        let mem = Runner::new(ExecMode::InMemory, cfg).run_bytes(input.as_bytes()).unwrap();
        prop_assert_eq!(seq.table, mem.table);
    }

    #[test]
    fn merge_of_any_split_equals_whole(
        records in proptest::collection::vec(record(), 1..120),
        cut in any::<prop::sample::Index>(),
    ) {
        let input = render_input(&records, true);
        let lines: Vec<&str> = input.split_inclusive('\n').collect();
        let at = cut.index(lines.len() + 1);
        let (left, right) = (lines[..at].concat(), lines[at..].concat());

        let whole = process_chunk(input.as_bytes()).unwrap();
        let mut l = process_chunk(left.as_bytes()).unwrap();
        let r = process_chunk(right.as_bytes()).unwrap();
        let mut r2 = r.clone();
        r2.merge(l.clone());
        l.merge(r);

        prop_assert_eq!(&l, &whole);
        prop_assert_eq!(&r2, &whole);
    }

    #[test]
    fn mean_is_bounded(records in proptest::collection::vec(record(), 1..200)) {
        let table = AggregateTable::from_records(records);
        for (_, agg) in table.iter() {
            let s = agg.stats();
            prop_assert!(s.min <= s.mean && s.mean <= s.max);
        }
    }
}
