//! The built-in package table.
//!
//! Repository rules list the name used on most systems as the default and
//! override it where a family, manager or single distribution differs. An
//! empty override marks the package as unavailable there.

use super::RuleTarget::{Distro, Family, Manager};
use super::{FlatpakSpec, PackageManager as Pm, PackageSpec, SnapSpec};
use crate::common::distro::{OperatingSystem as Os, RepositoryFamily as Fam};
use crate::{names, package};

pub static PACKAGES: &[PackageSpec] = &[
    // Server
    package! {
        "cockpit", "Cockpit - Web Interface", Server,
        repo: names!(["cockpit"]),
    },
    package! {
        "curl", "cURL - Client URL", Server,
        repo: names!(["curl"]),
    },
    package! {
        "dotnet-runtime", "dotnet - C# runtime 8.0 LTS", Server,
        repo: names!(["dotnet-runtime-8.0"]),
        snap: SnapSpec::new("dotnet-runtime-80"),
    },
    package! {
        "dotnet-sdk", "dotnet - C# SDK 8.0 LTS", Server,
        repo: names!(["dotnet-sdk-8.0"]),
        snap: SnapSpec::new("dotnet-sdk").classic().channel("8.0/stable"),
    },
    package! {
        "flatpak", "Flatpak", Server,
        repo: names!(["flatpak"]),
    },
    package! {
        "git", "git - Version Control", Server,
        repo: names!(["git"]),
    },
    package! {
        "go", "Go Language", Server,
        repo: names!(["golang", "gopls"];
            Distro(Os::Fedora) => ["golang", "golang-x-tools-gopls"],
            Family(Fam::RedHat) => ["golang"],
            Manager(Pm::Pacman) => ["go", "gopls"],
            Manager(Pm::Zypper) => ["go", "gopls"],
        ),
        snap: SnapSpec::new("go").classic(),
    },
    package! {
        "htop", "htop - Process Reviewer", Server,
        repo: names!(["htop"]),
    },
    package! {
        "mariadb", "MariaDB - Database", Server,
        repo: names!(["mariadb-server"];
            Manager(Pm::Pacman) => ["mariadb"],
            Manager(Pm::Zypper) => ["mariadb"],
        ),
    },
    package! {
        "nano", "nano - Text Editor", Server,
        repo: names!(["nano"]),
    },
    package! {
        "neovim", "neovim - Text Editor", Server,
        repo: names!(["neovim"]; Family(Fam::RedHat) => []),
    },
    package! {
        "node", "Node.js - JavaScript RE", Server,
        repo: names!(["nodejs", "npm"]; Manager(Pm::Zypper) => ["nodejs16", "npm16"]),
        modules: names!([]; Manager(Pm::Dnf) => ["nodejs:18"]),
        snap: SnapSpec::new("node").classic().channel("18/stable"),
    },
    package! {
        "pip", "pip - Python Packages", Server,
        repo: names!(["python3-pip"];
            Manager(Pm::Pacman) => ["python-pip"],
            Manager(Pm::Zypper) => ["python38-pip"],
        ),
    },
    package! {
        "podman", "Podman - Containers", Server,
        repo: names!(["podman"]),
    },
    package! {
        "rust", "Rust Language", Server,
        repo: names!(["rust", "rustfmt", "cargo"];
            Family(Fam::Ubuntu) => ["rustc", "rustfmt", "cargo"],
            Manager(Pm::Apt) => ["rustc", "cargo"],
            Manager(Pm::Pacman) => ["rustup"],
        ),
        snap: SnapSpec::new("rustup").classic(),
    },
    package! {
        "snapd", "Snap", Server,
        repo: names!(["snapd"]; Manager(Pm::Pacman) => []),
    },
    package! {
        "ssh", "SSH - Secure Shell Protocol", Server,
        repo: names!(["libssh", "openssh"];
            Manager(Pm::Apt) => ["ssh"],
            Manager(Pm::Zypper) => ["libssh4", "openssh"],
        ),
    },
    package! {
        "vim", "vim - Text Editor", Server,
        repo: names!(["vim"]; Manager(Pm::Dnf) => ["vim-enhanced"]),
    },
    // Desktop
    package! {
        "cups", "cups - Printer Support", Desktop,
        repo: names!(["cups"]),
    },
    package! {
        "ffmpeg", "ffmpeg - Media Codecs", Desktop,
        repo: names!(["ffmpeg"]; Manager(Pm::Zypper) => ["ffmpeg-4"]),
    },
    package! {
        "ibus-unikey", "Vietnamese Keyboard", Desktop,
        repo: names!(["ibus-unikey"]; Family(Fam::RedHat) => []),
    },
    package! {
        "id3v2", "MP3 Metadata Editor", Desktop,
        repo: names!(["id3v2"]; Family(Fam::RedHat) => []),
    },
    package! {
        "imagemagick", "imagemagick", Desktop,
        repo: names!(["imagemagick"];
            Manager(Pm::Dnf) => ["ImageMagick"],
            Manager(Pm::Zypper) => ["ImageMagick"],
        ),
    },
    package! {
        "latex", "LaTex - Compiler", Desktop,
        repo: names!(["texlive-latex-base", "texlive-latex-extra"];
            Distro(Os::Fedora) => ["texlive-latex", "texlive-collection-latexextra"],
            Family(Fam::RedHat) => ["texlive-latex"],
            Manager(Pm::Pacman) => ["texlive-core", "texlive-latexextra"],
            Manager(Pm::Zypper) => ["texlive-latex"],
        ),
    },
    package! {
        "qtile", "qtile - Window Manager", Desktop,
        repo: names!([];
            Manager(Pm::Pacman) => ["qtile", "alacritty", "rofi", "numlockx", "playerctl"],
        ),
    },
    package! {
        "yt-dlp", "yt-dlp - Download YouTube", Desktop,
        repo: names!(["yt-dlp"]; Family(Fam::Debian) => []),
    },
    // Applications
    package! {
        "cheese", "Cheese - Webcam", Applications,
        repo: names!(["cheese"]),
        flatpak: FlatpakSpec::new("org.gnome.Cheese"),
        desktop: Gnome,
    },
    package! {
        "deja-dup", "Deja Dup - Backups", Applications,
        repo: names!(["deja-dup"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.DejaDup"),
        desktop: Gnome,
    },
    package! {
        "evince", "Evince - Document Viewer", Applications,
        repo: names!(["evince"]),
        flatpak: FlatpakSpec::new("org.gnome.Evince"),
        desktop: Gnome,
    },
    package! {
        "eog", "Eye of Gnome - Image Viewer", Applications,
        repo: names!(["eog"]),
        flatpak: FlatpakSpec::new("org.gnome.eog"),
        snap: SnapSpec::new("eog"),
        desktop: Gnome,
    },
    package! {
        "gnome-boxes", "Gnome Boxes - VM Manager", Applications,
        repo: names!(["gnome-boxes"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Boxes"),
        desktop: Gnome,
    },
    package! {
        "gnome-calculator", "Gnome Calculator", Applications,
        repo: names!(["gnome-calculator"]),
        flatpak: FlatpakSpec::new("org.gnome.Calculator"),
        snap: SnapSpec::new("gnome-calculator"),
        desktop: Gnome,
    },
    package! {
        "gnome-calendar", "Gnome Calendar", Applications,
        repo: names!(["gnome-calendar"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Calendar"),
        desktop: Gnome,
    },
    package! {
        "gnome-camera", "Gnome Camera", Applications,
        repo: names!(["snapshot"];
            Family(Fam::Ubuntu) => ["gnome-snapshot"],
            Family(Fam::Debian) => [],
            Family(Fam::RedHat) => [],
        ),
        flatpak: FlatpakSpec::new("org.gnome.Snapshot"),
        desktop: Gnome,
    },
    package! {
        "gnome-clocks", "Gnome Clocks", Applications,
        repo: names!(["gnome-clocks"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.clocks"),
        snap: SnapSpec::new("gnome-clocks"),
        desktop: Gnome,
    },
    package! {
        "gnome-connections", "Gnome Connections", Applications,
        repo: names!(["gnome-connections"]),
        flatpak: FlatpakSpec::new("org.gnome.Connections"),
        desktop: Gnome,
    },
    package! {
        "gnome-contacts", "Gnome Contacts", Applications,
        repo: names!(["gnome-contacts"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Contacts"),
        desktop: Gnome,
    },
    package! {
        "loupe", "Gnome Image Viewer", Applications,
        repo: names!([]; Distro(Os::Fedora) => ["loupe"]),
        flatpak: FlatpakSpec::new("org.gnome.Loupe"),
        snap: SnapSpec::new("loupe"),
        desktop: Gnome,
    },
    package! {
        "gnome-maps", "Gnome Maps", Applications,
        repo: names!(["gnome-maps"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Maps"),
        desktop: Gnome,
    },
    package! {
        "gnome-passwordsafe", "Gnome Password Safe", Applications,
        repo: names!(["gnome-passwordsafe"];
            Distro(Os::Fedora) => ["secrets"],
            Family(Fam::RedHat) => [],
        ),
        flatpak: FlatpakSpec::new("org.gnome.World.Secrets"),
        desktop: Gnome,
    },
    package! {
        "gnome-weather", "Gnome Weather", Applications,
        repo: names!(["gnome-weather"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Weather"),
        desktop: Gnome,
    },
    package! {
        "gnucash", "GNU Cash - Accounting", Applications,
        repo: names!(["gnucash"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnucash.GnuCash"),
    },
    package! {
        "gwenview", "Gwenview - Image Viewer", Applications,
        repo: names!(["gwenview"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.kde.gwenview"),
        snap: SnapSpec::new("gwenview"),
        desktop: Plasma,
    },
    package! {
        "kcalc", "KCalc - Calculator", Applications,
        repo: names!(["kcalc"]),
        flatpak: FlatpakSpec::new("org.kde.kcalc"),
        snap: SnapSpec::new("kcalc"),
        desktop: Plasma,
    },
    package! {
        "okular", "Okular - Document Viewer", Applications,
        repo: names!(["okular"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.kde.okular"),
        snap: SnapSpec::new("okular"),
        desktop: Plasma,
    },
    package! {
        "transmission-gtk", "Transmission (GTK) - Torrent", Applications,
        repo: names!(["transmission-gtk"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("com.transmissionbt.Transmission"),
        desktop: Gnome,
    },
    package! {
        "transmission-qt", "Transmission (QT) - Torrent", Applications,
        repo: names!(["transmission-qt"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("com.transmissionbt.Transmission"),
        desktop: Plasma,
    },
    package! {
        "virt-manager", "Virt Manager", Applications,
        repo: names!(["virt-manager"]),
    },
    // Browsers
    package! {
        "chromium", "Chromium", Browsers,
        repo: names!(["chromium"];
            Family(Fam::Ubuntu) => [],
            Family(Fam::RedHat) => [],
        ),
        flatpak: FlatpakSpec::new("org.chromium.Chromium"),
        snap: SnapSpec::new("chromium"),
    },
    package! {
        "epiphany", "Epiphany - Gnome Web", Browsers,
        repo: names!(["epiphany"];
            Family(Fam::RedHat) => [],
            Manager(Pm::Apt) => ["epiphany-browser"],
        ),
        flatpak: FlatpakSpec::new("org.gnome.Epiphany"),
        desktop: Gnome,
    },
    package! {
        "firefox", "Firefox", Browsers,
        repo: names!(["firefox"];
            Family(Fam::Ubuntu) => [],
            Family(Fam::Debian) => [],
            Family(Fam::RedHat) => [],
        ),
        flatpak: FlatpakSpec::new("org.mozilla.firefox"),
        snap: SnapSpec::new("firefox"),
    },
    package! {
        "firefox-esr", "Firefox ESR", Browsers,
        repo: names!([];
            Family(Fam::Debian) => ["firefox-esr"],
            Family(Fam::RedHat) => ["firefox"],
        ),
        snap: SnapSpec::new("firefox").channel("esr-stable"),
    },
    package! {
        "icecat", "IceCat - GNU Browser", Browsers,
        repo: names!([]; Distro(Os::Fedora) => ["icecat"]),
    },
    // Communication
    package! {
        "discord", "Discord", Communication,
        repo: names!([]; Manager(Pm::Pacman) => ["discord"]),
        flatpak: FlatpakSpec::new("com.discordapp.Discord"),
        snap: SnapSpec::new("discord").unofficial(),
    },
    package! {
        "thunderbird", "Thunderbird", Communication,
        repo: names!(["thunderbird"]),
        flatpak: FlatpakSpec::new("org.mozilla.Thunderbird"),
        snap: SnapSpec::new("thunderbird"),
    },
    // Games
    package! {
        "0ad", "0 A.D.", Games,
        repo: names!(["0ad"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("com.play0ad.zeroad"),
        snap: SnapSpec::new("0ad"),
    },
    package! {
        "gnome-2048", "Gnome 2048", Games,
        repo: names!(["gnome-2048"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.TwentyFortyEight"),
        desktop: Gnome,
    },
    package! {
        "gnome-chess", "Gnome Chess", Games,
        repo: names!(["gnome-chess"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Chess"),
        desktop: Gnome,
    },
    package! {
        "gnome-mines", "Gnome Mines", Games,
        repo: names!(["gnome-mines"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Mines"),
        desktop: Gnome,
    },
    package! {
        "aisleriot", "Gnome Solitaire", Games,
        repo: names!(["aisleriot"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Aisleriot"),
        desktop: Gnome,
    },
    package! {
        "gnome-sudoku", "Gnome Sudoku", Games,
        repo: names!(["gnome-sudoku"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Sudoku"),
        snap: SnapSpec::new("gnome-sudoku"),
        desktop: Gnome,
    },
    package! {
        "quadrapassel", "Gnome Tetris", Games,
        repo: names!(["quadrapassel"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Quadrapassel"),
        snap: SnapSpec::new("quadrapassel"),
        desktop: Gnome,
    },
    package! {
        "knights", "KDE Chess", Games,
        repo: names!(["knights"]; Family(Fam::RedHat) => []),
        snap: SnapSpec::new("knights"),
        desktop: Plasma,
    },
    package! {
        "kmines", "KDE Mines", Games,
        repo: names!(["kmines"]),
        snap: SnapSpec::new("kmines"),
        desktop: Plasma,
    },
    package! {
        "ksudoku", "KDE Sudoku", Games,
        repo: names!(["ksudoku"]),
        flatpak: FlatpakSpec::new("org.kde.ksudoku"),
        snap: SnapSpec::new("ksudoku"),
        desktop: Plasma,
    },
    package! {
        "steam", "Steam", Games,
        repo: names!([];
            Distro(Os::Fedora) => ["steam"],
            Manager(Pm::Pacman) => ["steam"],
        ),
        flatpak: FlatpakSpec::new("com.valvesoftware.Steam"),
        snap: SnapSpec::new("steam"),
    },
    package! {
        "supertuxkart", "Super Tux Kart", Games,
        repo: names!(["supertuxkart"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("net.supertuxkart.SuperTuxKart"),
        snap: SnapSpec::new("supertuxkart").unofficial(),
    },
    package! {
        "xonotic", "Xonotic", Games,
        repo: names!([];
            Distro(Os::Fedora) => ["xonotic"],
            Manager(Pm::Pacman) => ["xonotic"],
        ),
        flatpak: FlatpakSpec::new("org.xonotic.Xonotic"),
        snap: SnapSpec::new("xonotic").unofficial(),
    },
    // Multi Media
    package! {
        "blender", "Blender", MultiMedia,
        repo: names!(["blender"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.blender.Blender"),
        snap: SnapSpec::new("blender").classic(),
    },
    package! {
        "elisa", "Elisa Music Player", MultiMedia,
        repo: names!(["elisa"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.kde.elisa"),
        desktop: Plasma,
    },
    package! {
        "gimp", "GIMP", MultiMedia,
        repo: names!(["gimp"]),
        flatpak: FlatpakSpec::new("org.gimp.GIMP"),
        snap: SnapSpec::new("gimp").unofficial(),
    },
    package! {
        "gnome-music", "Gnome Music", MultiMedia,
        repo: names!(["gnome-music"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Music"),
        desktop: Gnome,
    },
    package! {
        "gnome-photos", "Gnome Photos", MultiMedia,
        repo: names!(["gnome-photos"]),
        flatpak: FlatpakSpec::new("org.gnome.Photos"),
        desktop: Gnome,
    },
    package! {
        "gnome-sound-recorder", "Gnome Sound Recorder", MultiMedia,
        repo: names!(["gnome-sound-recorder"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.SoundRecorder"),
        desktop: Gnome,
    },
    package! {
        "kdenlive", "KdenLive Video Editor", MultiMedia,
        repo: names!(["kdenlive"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.kde.kdenlive"),
        snap: SnapSpec::new("kdenlive"),
        desktop: Plasma,
    },
    package! {
        "rhythmbox", "RhythmBox", MultiMedia,
        repo: names!(["rhythmbox"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Rhythmbox3"),
        desktop: Gnome,
    },
    package! {
        "shotwell", "Shotwell", MultiMedia,
        repo: names!(["shotwell"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Shotwell"),
        desktop: Gnome,
    },
    package! {
        "totem", "Totem Video Player", MultiMedia,
        repo: names!(["totem"]),
        flatpak: FlatpakSpec::new("org.gnome.Totem"),
        desktop: Gnome,
    },
    package! {
        "vlc", "VLC", MultiMedia,
        repo: names!(["vlc"]),
        flatpak: FlatpakSpec::new("org.videolan.VLC"),
        snap: SnapSpec::new("vlc"),
    },
    // Editors
    package! {
        "gedit", "gedit", Editors,
        repo: names!(["gedit"]),
        flatpak: FlatpakSpec::new("org.gnome.gedit"),
        snap: SnapSpec::new("gedit"),
        desktop: Gnome,
    },
    package! {
        "gnome-builder", "Gnome Builder", Editors,
        repo: names!(["gnome-builder"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.Builder"),
        desktop: Gnome,
    },
    package! {
        "gnome-text-editor", "Gnome Text Editor", Editors,
        repo: names!(["gnome-text-editor"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.gnome.TextEditor"),
        desktop: Gnome,
    },
    package! {
        "intellij", "Intellij", Editors,
        repo: names!([]; Manager(Pm::Pacman) => ["intellij-idea-community-edition"]),
        flatpak: FlatpakSpec::new("com.jetbrains.IntelliJ-IDEA-Community"),
        snap: SnapSpec::new("intellij-idea-community").classic(),
    },
    package! {
        "kate", "Kate", Editors,
        repo: names!(["kate"]),
        snap: SnapSpec::new("kate").classic(),
        desktop: Plasma,
    },
    package! {
        "kdevelop", "KDevelop", Editors,
        repo: names!(["kdevelop"]; Family(Fam::RedHat) => []),
        flatpak: FlatpakSpec::new("org.kde.kdevelop"),
        snap: SnapSpec::new("kdevelop").classic(),
        desktop: Plasma,
    },
    package! {
        "kile", "Kile - LaTex Editor", Editors,
        repo: names!(["kile"]; Family(Fam::RedHat) => []),
        desktop: Plasma,
    },
    package! {
        "kwrite", "KWrite", Editors,
        repo: names!(["kwrite"]),
        flatpak: FlatpakSpec::new("org.kde.kwrite"),
        desktop: Plasma,
    },
    package! {
        "libreoffice", "LibreOffice", Editors,
        repo: names!([
            "libreoffice-writer",
            "libreoffice-calc",
            "libreoffice-impress",
            "libreoffice-draw",
            "libreoffice-base",
        ]; Manager(Pm::Pacman) => ["libreoffice-fresh"]),
        flatpak: FlatpakSpec::new("org.libreoffice.LibreOffice"),
        snap: SnapSpec::new("libreoffice"),
    },
    package! {
        "pycharm", "Pycharm", Editors,
        repo: names!([];
            Distro(Os::Fedora) => ["pycharm-community"],
            Manager(Pm::Pacman) => ["pycharm-community-edition"],
        ),
        flatpak: FlatpakSpec::new("com.jetbrains.PyCharm-Community"),
        snap: SnapSpec::new("pycharm-community").classic(),
    },
    package! {
        "code", "VS Code", Editors,
        repo: names!(["code"]; Family(Fam::Ubuntu) => []),
        flatpak: FlatpakSpec::new("com.visualstudio.code"),
        snap: SnapSpec::new("code").classic(),
    },
    // Software
    package! {
        "gnome-software", "Gnome Software", Software,
        repo: names!(["gnome-software"]; Distro(Os::PopOS) => []),
        desktop: Gnome,
    },
    package! {
        "plasma-discover", "Plasma Discover", Software,
        repo: names!(["plasma-discover"];
            Family(Fam::RedHat) => [],
            Manager(Pm::Pacman) => ["discover"],
        ),
        desktop: Plasma,
    },
    package! {
        "snap-store", "Snap Store", Software,
        repo: names!([]),
        snap: SnapSpec::new("snap-store"),
    },
    // Utilities
    package! {
        "ark", "Ark Archiving", Utilities,
        repo: names!(["ark"]),
        flatpak: FlatpakSpec::new("org.kde.ark"),
        snap: SnapSpec::new("ark"),
        desktop: Plasma,
    },
    package! {
        "dconf-editor", "dconf Editor", Utilities,
        repo: names!(["dconf-editor"]),
        flatpak: FlatpakSpec::new("ca.desrt.dconf-editor"),
        desktop: Gnome,
    },
    package! {
        "mediawriter", "Fedora Media Writer", Utilities,
        repo: names!([]; Distro(Os::Fedora) => ["mediawriter"]),
        flatpak: FlatpakSpec::new("org.fedoraproject.MediaWriter").from_remote("flathub"),
    },
    package! {
        "filelight", "FileLight Disk Usage", Utilities,
        repo: names!(["filelight"]),
        desktop: Plasma,
    },
    package! {
        "gparted", "GParted", Utilities,
        repo: names!(["gparted"]),
        desktop: Gnome,
    },
    package! {
        "baobab", "Gnome Disk Usage", Utilities,
        repo: names!(["baobab"]),
        flatpak: FlatpakSpec::new("org.gnome.baobab"),
        desktop: Gnome,
    },
    package! {
        "gnome-disk-utility", "Gnome Disk Utility", Utilities,
        repo: names!(["gnome-disk-utility"]),
        desktop: Gnome,
    },
    package! {
        "gnome-shell-extensions", "Gnome Shell Extension", Utilities,
        repo: names!(["gnome-shell-extensions"]; Manager(Pm::Dnf) => ["gnome-extensions-app"]),
        desktop: Gnome,
    },
    package! {
        "gnome-shell-extension-manager", "Gnome Shell Extension Manager", Utilities,
        repo: names!([]; Manager(Pm::Apt) => ["gnome-shell-extension-manager"]),
        desktop: Gnome,
    },
    package! {
        "gnome-system-monitor", "Gnome System Monitor", Utilities,
        repo: names!(["gnome-system-monitor"]),
        desktop: Gnome,
    },
    package! {
        "gnome-tweaks", "Gnome Tweaks", Utilities,
        repo: names!(["gnome-tweaks"]),
        desktop: Gnome,
    },
    package! {
        "ksysguard", "KSysGuard", Utilities,
        repo: names!(["ksysguard"]),
        desktop: Plasma,
    },
    package! {
        "plasma-systemmonitor", "Plasma System Monitor", Utilities,
        repo: names!(["plasma-systemmonitor"]),
        desktop: Plasma,
    },
    package! {
        "simple-scan", "Simple Scan", Utilities,
        repo: names!(["simple-scan"]; Family(Fam::RedHat) => []),
    },
    package! {
        "spectacle", "Spectacle Screenshot", Utilities,
        repo: names!(["spectacle"]),
        desktop: Plasma,
    },
];
