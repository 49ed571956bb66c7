use std::time::Duration;

use insta::assert_snapshot;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::config::{Panel, PanelSet, all_panels, default_panels};
use crate::error::MetricUnavailable;
use crate::system::snapshot::{
    CpuUsage, DiskUsage, InterfaceDelta, LoadAverage, MemoryUsage, NetworkActivity, Snapshot,
    SystemInfo, TaskCounts, UserUsage,
};
use crate::ui::theme::Theme;
use crate::ui::{View, buffer_to_string, draw, panels, render_text};

const GIB: u64 = 1024 * 1024 * 1024;

fn full_snapshot() -> Snapshot {
    Snapshot {
        cpu: Some(Ok(CpuUsage {
            aggregate_percent: 37.5,
            per_core_percent: vec![12.0, 55.0, 91.0, 0.0],
        })),
        memory: Some(Ok(MemoryUsage {
            total: 16 * GIB,
            used: 6 * GIB,
            available: 10 * GIB,
            swap_total: 2 * GIB,
            swap_used: GIB / 4,
        })),
        disk: Some(Ok(vec![DiskUsage {
            mount_point: "/".to_string(),
            file_system: "ext4".to_string(),
            total: 500 * GIB,
            available: 200 * GIB,
        }])),
        users: Some(Ok(vec![UserUsage {
            name: "alice".to_string(),
            cpu_percent: 4.5,
            memory_percent: 12.25,
            processes: 42,
        }])),
        network: Some(Ok(NetworkActivity {
            interfaces: vec![InterfaceDelta {
                name: "eth0".to_string(),
                is_virtual: false,
                bytes_sent: 2048,
                bytes_received: 8192,
                packets_sent: 10,
                packets_received: 20,
            }],
            window: Some(Duration::from_secs(2)),
        })),
        load: Some(Ok(LoadAverage {
            one: 0.52,
            five: 0.58,
            fifteen: 0.59,
            tasks: Some(TaskCounts {
                runnable: 2,
                total: 812,
            }),
        })),
        system: Some(Ok(SystemInfo {
            hostname: Some("devbox".to_string()),
            os_version: Some("Linux 24.04 Ubuntu".to_string()),
            kernel_version: Some("6.8.0".to_string()),
            uptime_secs: 90_061,
        })),
    }
}

/// Same readings, restricted to the panels a sampler would have queried.
fn snapshot_for(panels: &PanelSet) -> Snapshot {
    let full = full_snapshot();
    Snapshot {
        cpu: full.cpu.filter(|_| panels.contains(&Panel::Cpu)),
        memory: full.memory.filter(|_| panels.contains(&Panel::Memory)),
        disk: full.disk.filter(|_| panels.contains(&Panel::Disk)),
        users: full.users.filter(|_| panels.contains(&Panel::Users)),
        network: full.network.filter(|_| panels.contains(&Panel::Network)),
        load: full.load.filter(|_| panels.contains(&Panel::Load)),
        system: full.system.filter(|_| panels.contains(&Panel::System)),
    }
}

fn render(snapshot: Option<&Snapshot>, panels: &PanelSet, width: u16, height: u16) -> String {
    let theme = Theme::default();
    let view = View {
        snapshot,
        host_name: None,
        panels,
        interval: Duration::from_secs(1),
        theme: &theme,
    };
    render_text(view, width, height)
}

/// Titles appear in the top border as ` Title `.
fn has_section(frame: &str, panel: Panel) -> bool {
    frame.contains(&format!(" {} \u{2500}", panel.title()))
}

#[test]
fn default_panels_show_cpu_and_memory_only() {
    let panels = default_panels();
    let frame = render(Some(&snapshot_for(&panels)), &panels, 100, 30);

    assert!(has_section(&frame, Panel::Cpu), "{frame}");
    assert!(has_section(&frame, Panel::Memory), "{frame}");
    for absent in ["Network", "Load", "System"] {
        assert!(!frame.contains(absent), "unexpected {absent} in:\n{frame}");
    }
}

#[test]
fn each_panel_alone_renders_only_its_section() {
    for panel in Panel::ALL {
        let panels = PanelSet::from([panel]);
        let frame = render(Some(&snapshot_for(&panels)), &panels, 120, 30);
        for other in Panel::ALL {
            assert_eq!(
                has_section(&frame, other),
                other == panel,
                "{other} with only {panel} enabled:\n{frame}"
            );
        }
    }
}

#[test]
fn all_panels_render_in_fixed_order() {
    let panels = all_panels();
    let frame = render(Some(&full_snapshot()), &panels, 140, 80);

    let positions: Vec<usize> = Panel::ALL
        .iter()
        .map(|p| {
            frame
                .find(&format!(" {} \u{2500}", p.title()))
                .unwrap_or_else(|| panic!("{p} missing:\n{frame}"))
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{frame}");
}

#[test]
fn failed_network_shows_marker_and_keeps_other_panels() {
    let panels = PanelSet::from([Panel::Cpu, Panel::Memory, Panel::Network]);
    let mut snapshot = snapshot_for(&panels);
    snapshot.network = Some(Err(MetricUnavailable::Failed("permission denied".to_string())));

    let frame = render(Some(&snapshot), &panels, 100, 30);

    let network_row = frame
        .lines()
        .position(|l| l.contains(" Network \u{2500}"))
        .unwrap();
    let body = frame.lines().nth(network_row + 1).unwrap();
    assert!(body.contains("unavailable"), "{frame}");
    assert!(body.contains("permission denied"), "{frame}");
    assert!(frame.contains("Average: 37.50%"), "{frame}");
    assert!(frame.contains("RAM 37.5%"), "{frame}");
}

#[test]
fn first_frame_shows_sampling_placeholders() {
    let panels = default_panels();
    let frame = render(None, &panels, 80, 20);

    assert!(has_section(&frame, Panel::Cpu));
    assert!(has_section(&frame, Panel::Memory));
    assert_eq!(frame.matches("sampling\u{2026}").count(), 2, "{frame}");
    assert!(frame.contains("starting"), "{frame}");
}

#[test]
fn tiny_terminals_do_not_panic() {
    let panels = all_panels();
    let snapshot = full_snapshot();
    for (w, h) in [(0, 0), (1, 1), (3, 2), (10, 4), (20, 6), (40, 8)] {
        let _ = render(Some(&snapshot), &panels, w, h);
    }
}

#[test]
fn cpu_columns_follow_width() {
    let panels = PanelSet::from([Panel::Cpu]);
    let snapshot = snapshot_for(&panels);

    let narrow = render(Some(&snapshot), &panels, 40, 20);
    let wide = render(Some(&snapshot), &panels, 160, 20);

    let core_lines = |frame: &str| frame.lines().filter(|l| l.contains("Core ")).count();
    assert_eq!(core_lines(&narrow), 4, "{narrow}");
    assert_eq!(core_lines(&wide), 1, "{wide}");
    assert!(wide.contains("Core 3: ["), "{wide}");
}

#[test]
fn empty_users_list_says_so() {
    let panels = PanelSet::from([Panel::Users]);
    let snapshot = Snapshot {
        users: Some(Ok(Vec::new())),
        ..Snapshot::default()
    };
    let frame = render(Some(&snapshot), &panels, 80, 10);
    assert!(frame.contains("No users above threshold"), "{frame}");
}

#[test]
fn first_network_sample_has_no_rate() {
    let panels = PanelSet::from([Panel::Network]);
    let mut snapshot = snapshot_for(&panels);
    if let Some(Ok(activity)) = snapshot.network.as_mut() {
        activity.window = None;
    }
    let frame = render(Some(&snapshot), &panels, 120, 10);
    let row = frame.lines().find(|l| l.contains("eth0")).unwrap();
    assert!(!row.contains("/s"), "{frame}");
    assert!(row.contains(" - "), "{frame}");
}

#[test]
fn load_panel_snapshot() {
    let snapshot = snapshot_for(&PanelSet::from([Panel::Load]));
    let area = Rect::new(0, 0, 44, 4);
    let mut buf = Buffer::empty(area);
    panels::render(Panel::Load, Some(&snapshot), area, &mut buf, &Theme::default());

    assert_snapshot!(buffer_to_string(&buf), @r"
    ╭ Load ────────────────────────────────────╮
    │1 min: 0.52 | 5 min: 0.58 | 15 min: 0.59  │
    │Tasks: 2 running / 812 total              │
    ╰──────────────────────────────────────────╯
    ");
}

#[test]
fn desired_height_tracks_content() {
    let snapshot = full_snapshot();
    assert_eq!(panels::desired_height(Panel::System, Some(&snapshot), 80), 6);
    assert_eq!(panels::desired_height(Panel::Load, Some(&snapshot), 80), 4);
    assert_eq!(panels::desired_height(Panel::Load, None, 80), 3);
    // header, one interface, total
    assert_eq!(panels::desired_height(Panel::Network, Some(&snapshot), 80), 5);
}

#[test]
fn draw_through_test_backend() {
    let panels = PanelSet::from([Panel::Cpu, Panel::System]);
    let snapshot = snapshot_for(&panels);
    let theme = Theme::default();
    let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();

    terminal
        .draw(|frame| {
            draw(
                frame,
                View {
                    snapshot: Some(&snapshot),
                    host_name: None,
                    panels: &panels,
                    interval: Duration::from_millis(2500),
                    theme: &theme,
                },
            )
        })
        .unwrap();

    let frame = buffer_to_string(terminal.backend().buffer());
    assert!(frame.contains("every 2.5s"), "{frame}");
    assert!(frame.contains("Host: devbox"), "{frame}");
    assert!(frame.contains("Uptime: 1d 01:01:01"), "{frame}");
    assert!(frame.contains("Quit"), "{frame}");
}
