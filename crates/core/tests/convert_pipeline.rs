//! End-to-end conversion of a small fixture voicebank.

use std::path::{Path, PathBuf};

use otodb_core::config::ConvertConfig;
use otodb_core::lists::write_lists;
use otodb_core::pipeline;
use otodb_core::place::place_files;

const OTO_INI: &str = "\
_ああ.wav=- あ,100,0,-500,20,5
_ああ.wav=あ,2000,0,-500,20,5
_ああ.wav=a い,600,0,-500,20,5
_ああ.wav=a 息,1500,0,-500,20,5
_ああ.wav=a -,1100,0,-520,20,5
_かか.wav=- か,200,0,-500,50,20
_かか.wav=k -,700,0,-30,20,5
_いい.wav=- ぎょ,100,0,-500,20,5
_いい.wav=o -,600,0,-500,20,5
";

const TABLE: &str = "\
あ a
い i
か k a
ぎょ g y o
R pau
";

struct Fixture {
    _dir: tempfile::TempDir,
    bank: PathBuf,
    table: PathBuf,
    out: PathBuf,
}

fn make_fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let bank = dir.path().join("C4");
    std::fs::create_dir_all(&bank).unwrap();
    std::fs::write(bank.join("oto.ini"), OTO_INI).unwrap();
    for wav in ["_ああ.wav", "_かか.wav", "_いい.wav"] {
        std::fs::write(bank.join(wav), format!("RIFF:{wav}")).unwrap();
    }
    let table = dir.path().join("table.txt");
    std::fs::write(&table, TABLE).unwrap();
    let out = dir.path().join("db");
    Fixture {
        bank,
        table,
        out,
        _dir: dir,
    }
}

fn make_config(fixture: &Fixture) -> ConvertConfig {
    ConvertConfig {
        otoini_path: fixture.bank.clone(),
        table_path: fixture.table.clone(),
        out_dir: fixture.out.clone(),
        tempo: 120.0,
        pitch: None,
        alternating_pitch: false,
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_convert_end_to_end() {
    let fixture = make_fixture();
    let resolved = make_config(&fixture).validate().unwrap();
    assert_eq!(resolved.note_num, 60);

    let summary = pipeline::run(&resolved).unwrap();
    assert_eq!(summary.recordings, 3);
    assert_eq!(summary.converted, 2);
    assert_eq!(summary.reconciled, 2);
    assert_eq!(summary.degenerate_notes, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].recording, "_いい.wav");
    assert_eq!(summary.failures[0].stage, "convert");

    // The three-phoneme alias left no partial outputs behind.
    assert!(!fixture.out.join("ust/C4_いい.ust").exists());
    assert!(!fixture.out.join("wav/C4_いい.wav").exists());

    let ust = read(&fixture.out.join("ust/C4_ああ.ust"));
    assert_eq!(
        ust,
        "[#VERSION]\n\
         UST Version1.20\n\
         [#SETTING]\n\
         Tempo=120.0\n\
         Tracks=1\n\
         ProjectName=C4_ああ\n\
         Mode2=True\n\
         [#0000]\n\
         Length=120\n\
         Lyric=R\n\
         NoteNum=60\n\
         Tempo=120.0\n\
         [#0001]\n\
         Length=480\n\
         Lyric=あ\n\
         NoteNum=60\n\
         Tempo=120.0\n\
         [#0002]\n\
         Length=480\n\
         Lyric=い\n\
         NoteNum=60\n\
         Tempo=120.0\n\
         [#0003]\n\
         Length=480\n\
         Lyric=R\n\
         NoteNum=60\n\
         Tempo=120.0\n\
         [#TRACKEND]\n"
    );

    // Alignment label keeps recorded timing, carries full-context symbols.
    let align = read(&fixture.out.join("label_phone_align/C4_ああ.lab"));
    assert_eq!(
        align,
        "0 1200000 xx^xx-pau+a=i/A:xx_xx/E:xx_2@1|1/F:C4_8\n\
         1200000 6200000 xx^pau-a+i=pau/A:xx_2/E:C4_8@1|1/F:C4_8\n\
         6200000 11200000 pau^a-i+pau=xx/A:C4_8/E:C4_8@1|1/F:xx_8\n\
         11200000 16200000 a^i-pau+xx=xx/A:C4_8/E:xx_8@1|1/F:xx_xx\n"
    );

    // Score label shares the symbols but is timed from the note grid.
    let score = read(&fixture.out.join("label_phone_score/C4_ああ.lab"));
    assert_eq!(
        score,
        "0 1250000 xx^xx-pau+a=i/A:xx_xx/E:xx_2@1|1/F:C4_8\n\
         1250000 6250000 xx^pau-a+i=pau/A:xx_2/E:C4_8@1|1/F:C4_8\n\
         6250000 11250000 pau^a-i+pau=xx/A:C4_8/E:C4_8@1|1/F:xx_8\n\
         11250000 16250000 a^i-pau+xx=xx/A:C4_8/E:xx_8@1|1/F:xx_xx\n"
    );

    // The consonant-vowel recording splits か at its overlap point.
    let align_k = read(&fixture.out.join("label_phone_align/C4_かか.lab"));
    let lines: Vec<&str> = align_k.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "2200000 2500000 xx^pau-k+a=pau/A:xx_4/E:C4_8@1|2/F:xx_0"
    );
    // The degenerate tail collapses to a zero-length score segment.
    let score_k = read(&fixture.out.join("label_phone_score/C4_かか.lab"));
    assert!(score_k
        .lines()
        .last()
        .unwrap()
        .starts_with("7500000 7500000 "));

    // WAVs are copied under prefixed names.
    assert_eq!(
        read(&fixture.out.join("wav/C4_ああ.wav")),
        "RIFF:_ああ.wav"
    );

    let json = read(&fixture.out.join("summary.json"));
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["converted"], 2);
    assert_eq!(parsed["failures"][0]["recording"], "_いい.wav");
}

#[test]
fn test_positive_cutoff_aborts_before_any_output() {
    let fixture = make_fixture();
    let broken = format!("{OTO_INI}_ああ.wav=a う,1800,0,5,20,5\n");
    std::fs::write(fixture.bank.join("oto.ini"), broken).unwrap();

    let resolved = make_config(&fixture).validate().unwrap();
    let err = pipeline::run(&resolved).unwrap_err();
    assert!(err.to_string().contains("positive cutoff"));
    assert!(!fixture.out.exists());
}

#[test]
fn test_place_and_lists_after_convert() {
    let fixture = make_fixture();
    let resolved = make_config(&fixture).validate().unwrap();
    pipeline::run(&resolved).unwrap();

    place_files(&fixture.out).unwrap();
    let acoustic_align = read(&fixture.out.join("acoustic/label_phone_align/C4_ああ.lab"));
    let acoustic_score = read(&fixture.out.join("acoustic/label_phone_score/C4_ああ.lab"));
    assert_ne!(acoustic_align, acoustic_score);
    assert!(fixture.out.join("acoustic/wav/C4_かか.wav").is_file());

    // duration and timelag get alignment timing in both label slots.
    for model in ["duration", "timelag"] {
        let placed_score = read(
            &fixture
                .out
                .join(model)
                .join("label_phone_score/C4_ああ.lab"),
        );
        assert_eq!(placed_score, acoustic_align);
        assert!(!fixture.out.join(model).join("wav").exists());
    }

    let lists = write_lists(&fixture.out, 6).unwrap();
    assert_eq!(lists.utt, vec!["C4_ああ", "C4_かか"]);
    assert_eq!(lists.eval, vec!["C4_ああ"]);
    assert!(lists.dev.is_empty());
    assert_eq!(lists.train_no_dev.len(), 2);
    assert_eq!(
        read(&fixture.out.join("list/utt.list")),
        "C4_ああ\nC4_かか"
    );
}
