use std::fs;
use std::path::Path;

const SAMPLE_WORLD: &str = "\
background sand 0 0
background sand 1 0
background sand 2 0
background sand 0 1
background sand 1 1
obstacle rock_1 6 2
obstacle rock_2 6 3
obstacle rock_3 6 4
obstacle rock_4 14 9
seaGrass kelp_1 3 3 4000
seaGrass kelp_2 10 6 5000
seaGrass kelp_3 16 2 6000
fish fish_1 4 8 21000
fish fish_2 12 1 24000
octo octo_1 1 9 3 900 120
octo octo_2 18 11 2 1100 150
atlantis atlantis_1 2 1
atlantis atlantis_2 19 7
";

const SAMPLE_IMAGES: &str = "\
water images/water.bmp
sand images/sand.bmp
obstacle images/rock.bmp 255 255 255
fish images/fish1.bmp 255 255 255
fish images/fish2.bmp 255 255 255
seaGrass images/kelp.bmp
crab images/crab1.bmp 0 0 0
crab images/crab2.bmp 0 0 0
octo images/octo1.bmp 255 255 255
octo images/octo2.bmp 255 255 255
octo images/octo3.bmp 255 255 255
atlantis images/atlantis1.bmp
atlantis images/atlantis2.bmp
quake images/quake1.bmp 0 0 0
quake images/quake2.bmp 0 0 0
";

pub fn run(dir: &Path) -> Result<(), String> {
    if dir.exists() {
        return Err(format!("directory '{}' already exists", dir.display()));
    }

    fs::create_dir_all(dir).map_err(|e| format!("cannot create directory: {e}"))?;
    fs::write(dir.join("world.sav"), SAMPLE_WORLD)
        .map_err(|e| format!("cannot write world.sav: {e}"))?;
    fs::write(dir.join("imagelist"), SAMPLE_IMAGES)
        .map_err(|e| format!("cannot write imagelist: {e}"))?;

    println!("Created sample world in {}/", dir.display());
    println!("  world.sav  entities and backgrounds, one per line");
    println!("  imagelist  frame paths per image key");
    println!();
    println!("Get started:");
    println!("  cd {}", dir.display());
    println!("  reef check           # Load the world and list what is in it");
    println!("  reef run --map       # Run 100 steps and print the grid");

    Ok(())
}
