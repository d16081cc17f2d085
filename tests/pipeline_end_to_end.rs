// tests/pipeline_end_to_end.rs

use cluster_lib::candidate_generation::{read_activity, ActivityIndex, InputOptions, PairOrder};
use cluster_lib::pipeline::{run_pipeline, PipelineOptions, PipelineOutput};
use cluster_lib::ClusteringConfig;
use std::io::Cursor;

const LOG: &str = "\
IP,Record
ip1,r1
ip1,r2
ip1,r3
ip1,r4
ip2,r1
ip2,r2
ip2,r3
ip3,r3
ip3,r4
ip4,r7
ip4,r8
ip4,r9
ip5,r7
ip5,r8
ip5,r9
";

fn permissive_config(min_cluster_size: usize) -> ClusteringConfig {
    ClusteringConfig {
        min_address_records: 0,
        min_record_addresses: 0,
        min_cluster_size,
        ..ClusteringConfig::default()
    }
}

fn run(data: &str, config: &ClusteringConfig) -> PipelineOutput {
    let mut index = ActivityIndex::new();
    let input_stats = read_activity(Cursor::new(data), &InputOptions::default(), &mut index).unwrap();
    run_pipeline(&index, input_stats, config, PipelineOptions { verify: true }, None).unwrap()
}

#[test]
fn pair_with_two_shared_records_is_never_clustered() {
    let output = run(LOG, &permissive_config(1));

    // ip1-ip3 share only r3 and r4
    assert!(output.session.cluster_of("ip3").is_none());
    assert!(output.stats.pairs_below_min_shared > 0);
    assert!(output.clusters.iter().all(|c| !c.members.contains(&"ip3".to_string())));

    assert_eq!(output.stats.assignments.pairs_assigned, 4);
    assert_eq!(output.stats.assignments.created, 2);
    assert_eq!(output.stats.assignments.internal, 2);
    assert_eq!(output.stats.live_clusters, 2);
}

#[test]
fn report_filters_by_size_and_sorts_descending() {
    let data = format!("{}ip6,r7\nip6,r8\nip6,r9\n", LOG);
    let output = run(&data, &permissive_config(2));

    let sizes: Vec<usize> = output.clusters.iter().map(|c| c.size).collect();
    assert_eq!(sizes, vec![3, 2]);
    assert_eq!(output.clusters[0].members, vec!["ip4", "ip5", "ip6"]);

    let output = run(&data, &permissive_config(3));
    assert_eq!(output.clusters.len(), 1);
    assert_eq!(output.stats.reported_clusters, 1);
    assert_eq!(output.stats.live_clusters, 2);
}

#[test]
fn default_pruning_drops_low_degree_addresses_and_records() {
    // Every address has at most four records: nothing survives default pruning.
    let output = run(LOG, &ClusteringConfig::default());
    assert_eq!(output.stats.qualifying_addresses, 0);
    assert!(output.clusters.is_empty());
    assert_eq!(output.stats.total_addresses, 5);
    assert_eq!(output.stats.rows_read, 15);
}

#[test]
fn default_thresholds_cluster_a_dense_group() {
    // Eight addresses all active on the same eight records.
    let mut data = String::from("IP,Record\n");
    for a in 0..8 {
        for r in 0..8 {
            data.push_str(&format!("10.0.0.{},rec{}\n", a, r));
        }
    }
    for config in [
        ClusteringConfig::default(),
        ClusteringConfig {
            pair_order: PairOrder::SharedDesc,
            ..ClusteringConfig::default()
        },
    ] {
        let output = run(&data, &config);
        assert_eq!(output.clusters.len(), 1);
        assert_eq!(output.clusters[0].size, 8);
        // 8 * 7 ordered pairs, every one absorbed inside the single cluster
        assert_eq!(output.stats.assignments.pairs_assigned, 56);
        assert_eq!(output.clusters[0].internal_connections, 56);
    }
}

#[test]
fn invalid_config_is_rejected() {
    let mut index = ActivityIndex::new();
    index.insert("ip1", "r1");
    let config = ClusteringConfig {
        merge_threshold: 0,
        ..ClusteringConfig::default()
    };
    let result = run_pipeline(&index, Default::default(), &config, PipelineOptions::default(), None);
    assert!(result.is_err());
}
